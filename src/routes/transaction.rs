use actix_web::{web, HttpResponse, Responder};
use bson::{doc, oid::ObjectId};
use chrono::{NaiveDate, Utc};
use futures::TryStreamExt;
use mongodb::Client;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::mongo::RENTALS_DB;
use crate::middleware::auth::Claims;
use crate::models::account::UserRole;
use crate::models::pagination::{PageQuery, Paginated};
use crate::models::peak_season_rate::PeakSeasonRate;
use crate::models::property::Property;
use crate::models::room::Room;
use crate::models::transaction::{StatusUpdateInput, StayInput, Transaction, TransactionStatus};
use crate::services::pricing_service::{PricingQuote, PricingService, SeasonWindow};

fn transactions(client: &Client) -> mongodb::Collection<Transaction> {
    client.database(RENTALS_DB).collection("Transactions")
}

/// Loads the room and its seasonal windows, then prices the stay.
/// Calculator rejections surface as 400s.
async fn price_stay(
    client: &Client,
    room_id: &str,
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> Result<(Room, PricingQuote), HttpResponse> {
    let room_id = ObjectId::parse_str(room_id)
        .map_err(|_| HttpResponse::BadRequest().body("Invalid room ID"))?;

    let rooms: mongodb::Collection<Room> = client.database(RENTALS_DB).collection("Rooms");
    let room = rooms
        .find_one(doc! { "_id": room_id })
        .await
        .map_err(|err| {
            log::error!("Failed to retrieve room: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve room")
        })?
        .ok_or_else(|| HttpResponse::NotFound().body("Room not found"))?;

    let rates: mongodb::Collection<PeakSeasonRate> =
        client.database(RENTALS_DB).collection("PeakSeasonRates");
    let windows: Vec<SeasonWindow> = rates
        .find(doc! { "room_id": room_id })
        .await
        .map_err(|err| {
            log::error!("Failed to retrieve seasonal rates: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve seasonal rates")
        })?
        .try_collect::<Vec<PeakSeasonRate>>()
        .await
        .map_err(|err| {
            log::error!("Failed to collect seasonal rates: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve seasonal rates")
        })?
        .iter()
        .map(SeasonWindow::from)
        .collect();

    let quote = PricingService::quote_stay(check_in, check_out, room.price, &windows)
        .map_err(|err| HttpResponse::BadRequest().body(err.to_string()))?;

    Ok((room, quote))
}

/*
    POST /api/transactions/quote

    Prices a prospective stay without persisting anything.
*/
pub async fn quote(
    data: web::Data<Arc<Client>>,
    input: web::Json<StayInput>,
    _claims: Claims,
) -> impl Responder {
    let client = data.into_inner();
    let input = input.into_inner();

    match price_stay(&client, &input.room_id, input.check_in, input.check_out).await {
        Ok((_, quote)) => HttpResponse::Ok().json(quote),
        Err(resp) => resp,
    }
}

/*
    POST /api/transactions
*/
pub async fn create_transaction(
    data: web::Data<Arc<Client>>,
    input: web::Json<StayInput>,
    claims: Claims,
) -> impl Responder {
    let client = data.into_inner();
    let input = input.into_inner();

    let user_id = match ObjectId::parse_str(&claims.user_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid user ID"),
    };

    let (room, quote) =
        match price_stay(&client, &input.room_id, input.check_in, input.check_out).await {
            Ok(priced) => priced,
            Err(resp) => return resp,
        };
    let room_id = match room.id {
        Some(id) => id,
        None => return HttpResponse::InternalServerError().body("Failed to create booking"),
    };

    let collection = transactions(&client);

    // A live booking whose stay overlaps this one blocks the room. Two stays
    // overlap when each starts before the other ends; back-to-back stays
    // (check-out == next check-in) do not collide.
    let conflict_filter = doc! {
        "room_id": room_id,
        "status": { "$in": ["pending", "confirmed"] },
        "check_in": { "$lt": input.check_out.to_string() },
        "check_out": { "$gt": input.check_in.to_string() },
    };

    match collection.find_one(conflict_filter).await {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().body("Room is not available for those dates")
        }
        Ok(None) => {}
        Err(err) => {
            log::error!("Failed to check availability: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to check availability");
        }
    }

    let time = Utc::now();
    let transaction = Transaction {
        id: None,
        user_id,
        room_id,
        property_id: room.property_id,
        booking_code: Uuid::new_v4().to_string(),
        check_in: input.check_in,
        check_out: input.check_out,
        nights: quote.nights,
        total_price: quote.total_price,
        peak_season_days: quote.peak_season_days,
        status: TransactionStatus::Pending,
        created_at: Some(time),
        updated_at: Some(time),
    };

    match collection.insert_one(&transaction).await {
        Ok(result) => HttpResponse::Ok().json(serde_json::json!({
            "id": result.inserted_id.as_object_id().map(|id| id.to_hex()).unwrap_or_default(),
            "booking_code": &transaction.booking_code,
            "quote": quote,
            "status": transaction.status,
        })),
        Err(err) => {
            log::error!("Failed to create booking: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to create booking")
        }
    }
}

/*
    GET /api/transactions
*/
pub async fn get_my_transactions(
    data: web::Data<Arc<Client>>,
    query: web::Query<PageQuery>,
    claims: Claims,
) -> impl Responder {
    let client = data.into_inner();

    let user_id = match ObjectId::parse_str(&claims.user_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid user ID"),
    };

    list_transactions(&client, doc! { "user_id": user_id }, query.into_inner()).await
}

/*
    GET /api/tenant/transactions
*/
pub async fn get_tenant_transactions(
    data: web::Data<Arc<Client>>,
    query: web::Query<PageQuery>,
    claims: Claims,
) -> impl Responder {
    let client = data.into_inner();

    let tenant_id = match ObjectId::parse_str(&claims.user_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid user ID"),
    };

    let properties: mongodb::Collection<Property> =
        client.database(RENTALS_DB).collection("Properties");

    let property_ids: Vec<ObjectId> = match properties.find(doc! { "tenant_id": tenant_id }).await
    {
        Ok(cursor) => match cursor.try_collect::<Vec<Property>>().await {
            Ok(properties) => properties.into_iter().filter_map(|p| p.id).collect(),
            Err(err) => {
                log::error!("Failed to collect properties: {:?}", err);
                return HttpResponse::InternalServerError().body("Failed to retrieve bookings");
            }
        },
        Err(err) => {
            log::error!("Failed to fetch properties: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to retrieve bookings");
        }
    };

    list_transactions(
        &client,
        doc! { "property_id": { "$in": property_ids } },
        query.into_inner(),
    )
    .await
}

async fn list_transactions(
    client: &Client,
    filter: bson::Document,
    page: PageQuery,
) -> HttpResponse {
    let collection = transactions(client);

    let total = match collection.count_documents(filter.clone()).await {
        Ok(total) => total,
        Err(err) => {
            log::error!("Failed to count bookings: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to retrieve bookings");
        }
    };

    let cursor = collection
        .find(filter)
        .sort(doc! { "created_at": -1 })
        .skip(page.skip())
        .limit(page.take())
        .await;

    match cursor {
        Ok(cursor) => match cursor.try_collect::<Vec<Transaction>>().await {
            Ok(results) => HttpResponse::Ok().json(Paginated::new(results, &page, total)),
            Err(err) => {
                log::error!("Failed to collect bookings: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to process bookings")
            }
        },
        Err(err) => {
            log::error!("Failed to retrieve bookings: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve bookings")
        }
    }
}

/// How the caller relates to a booking: the guest who made it, the tenant
/// whose property it is on, or an admin.
async fn actor_role(
    client: &Client,
    transaction: &Transaction,
    claims: &Claims,
) -> Result<UserRole, HttpResponse> {
    let role = claims
        .role
        .as_deref()
        .map(UserRole::from_claim)
        .unwrap_or(UserRole::User);
    if role == UserRole::Admin {
        return Ok(UserRole::Admin);
    }

    if transaction.user_id.to_hex() == claims.user_id {
        return Ok(UserRole::User);
    }

    let properties: mongodb::Collection<Property> =
        client.database(RENTALS_DB).collection("Properties");
    let owns_property = properties
        .find_one(doc! { "_id": transaction.property_id })
        .await
        .map_err(|err| {
            log::error!("Failed to retrieve property: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve booking")
        })?
        .map(|property| property.tenant_id.to_hex() == claims.user_id)
        .unwrap_or(false);

    if owns_property {
        Ok(UserRole::Tenant)
    } else {
        Err(HttpResponse::Forbidden().body("Forbidden"))
    }
}

/*
    GET /api/transactions/{id}
*/
pub async fn get_by_id(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    claims: Claims,
) -> impl Responder {
    let client = data.into_inner();

    let id: ObjectId = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid ID"),
    };

    match transactions(&client).find_one(doc! { "_id": id }).await {
        Ok(Some(transaction)) => match actor_role(&client, &transaction, &claims).await {
            Ok(_) => HttpResponse::Ok().json(transaction),
            Err(resp) => resp,
        },
        Ok(None) => HttpResponse::NotFound().body("Booking not found"),
        Err(err) => {
            log::error!("Failed to retrieve booking: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve booking")
        }
    }
}

/*
    PUT /api/transactions/{id}/status

    Tenants settle pending bookings (confirm or reject); guests may cancel
    their own pending booking. Settled bookings never change again.
*/
pub async fn update_status(
    data: web::Data<Arc<Client>>,
    input: web::Json<StatusUpdateInput>,
    path: web::Path<String>,
    claims: Claims,
) -> impl Responder {
    let client = data.into_inner();

    let id: ObjectId = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid ID"),
    };
    let next = input.into_inner().status;

    let collection = transactions(&client);

    let transaction = match collection.find_one(doc! { "_id": id }).await {
        Ok(Some(transaction)) => transaction,
        Ok(None) => return HttpResponse::NotFound().body("Booking not found"),
        Err(err) => {
            log::error!("Failed to retrieve booking: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to retrieve booking");
        }
    };

    let actor = match actor_role(&client, &transaction, &claims).await {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    if !transaction.status.can_transition(next, &actor) {
        return HttpResponse::Conflict().body(format!(
            "Cannot move booking from {} to {}",
            transaction.status.as_str(),
            next.as_str()
        ));
    }

    let update = doc! {
        "$set": {
            "status": next.as_str(),
            "updated_at": Utc::now().to_rfc3339(),
        }
    };

    match collection.update_one(doc! { "_id": id }, update).await {
        Ok(_) => {
            log::info!(
                "Booking {} moved from {} to {}",
                transaction.booking_code,
                transaction.status.as_str(),
                next.as_str()
            );
            HttpResponse::Ok().body("Booking status updated")
        }
        Err(err) => {
            log::error!("Failed to update booking: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to update booking")
        }
    }
}
