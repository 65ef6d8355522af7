use actix_web::{web, HttpResponse, Responder};
use bson::{doc, oid::ObjectId};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::Client;
use std::sync::Arc;

use crate::db::mongo::RENTALS_DB;
use crate::middleware::auth::Claims;
use crate::models::peak_season_rate::{PeakSeasonRate, PeakSeasonRateInput};
use crate::routes::room::owned_room;

fn rates(client: &Client) -> mongodb::Collection<PeakSeasonRate> {
    client.database(RENTALS_DB).collection("PeakSeasonRates")
}

fn validate_window(input: &PeakSeasonRateInput) -> Option<HttpResponse> {
    if input.end_date < input.start_date {
        return Some(
            HttpResponse::BadRequest().body("Window end date must not precede its start date"),
        );
    }
    if input.price <= 0.0 {
        return Some(HttpResponse::BadRequest().body("Window price must be positive"));
    }
    None
}

/*
    GET /api/rooms/{id}/peak-season-rates

    Public so guests can preview seasonal pricing before booking.
*/
pub async fn get_room_rates(
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
) -> impl Responder {
    let client = data.into_inner();

    let room_id: ObjectId = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid ID"),
    };

    match rates(&client)
        .find(doc! { "room_id": room_id })
        .sort(doc! { "start_date": 1 })
        .await
    {
        Ok(cursor) => match cursor.try_collect::<Vec<PeakSeasonRate>>().await {
            Ok(results) => HttpResponse::Ok().json(results),
            Err(err) => {
                log::error!("Failed to collect seasonal rates: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to process seasonal rates")
            }
        },
        Err(err) => {
            log::error!("Failed to retrieve seasonal rates: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve seasonal rates")
        }
    }
}

/*
    POST /api/peak-season-rates (tenant)
*/
pub async fn create_rate(
    data: web::Data<Arc<Client>>,
    input: web::Json<PeakSeasonRateInput>,
    claims: Claims,
) -> impl Responder {
    let client = data.into_inner();
    let input = input.into_inner();

    if let Some(resp) = validate_window(&input) {
        return resp;
    }

    let room = match owned_room(&client, &input.room_id, &claims).await {
        Ok(room) => room,
        Err(resp) => return resp,
    };
    let room_id = match room.id {
        Some(id) => id,
        None => return HttpResponse::InternalServerError().body("Failed to create seasonal rate"),
    };

    let time = Utc::now();
    let rate = PeakSeasonRate {
        id: None,
        room_id,
        start_date: input.start_date,
        end_date: input.end_date,
        price: input.price,
        created_at: Some(time),
        updated_at: Some(time),
    };

    match rates(&client).insert_one(&rate).await {
        Ok(result) => HttpResponse::Ok().json(doc! {
            "id": result.inserted_id.as_object_id().map(|id| id.to_hex()).unwrap_or_default()
        }),
        Err(err) => {
            log::error!("Failed to create seasonal rate: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to create seasonal rate")
        }
    }
}

/// Fetches a rate window after checking ownership of its room.
async fn owned_rate(
    client: &Client,
    rate_id: &str,
    claims: &Claims,
) -> Result<PeakSeasonRate, HttpResponse> {
    let id = ObjectId::parse_str(rate_id)
        .map_err(|_| HttpResponse::BadRequest().body("Invalid ID"))?;

    let rate = rates(client)
        .find_one(doc! { "_id": id })
        .await
        .map_err(|err| {
            log::error!("Failed to retrieve seasonal rate: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve seasonal rate")
        })?
        .ok_or_else(|| HttpResponse::NotFound().body("Seasonal rate not found"))?;

    owned_room(client, &rate.room_id.to_hex(), claims).await?;
    Ok(rate)
}

/*
    PUT /api/peak-season-rates/{id} (tenant, owner only)
*/
pub async fn update_rate(
    data: web::Data<Arc<Client>>,
    input: web::Json<PeakSeasonRateInput>,
    path: web::Path<String>,
    claims: Claims,
) -> impl Responder {
    let client = data.into_inner();
    let rate_id = path.into_inner();

    let rate = match owned_rate(&client, &rate_id, &claims).await {
        Ok(rate) => rate,
        Err(resp) => return resp,
    };

    let input = input.into_inner();
    if let Some(resp) = validate_window(&input) {
        return resp;
    }

    let update = doc! {
        "$set": {
            "start_date": input.start_date.to_string(),
            "end_date": input.end_date.to_string(),
            "price": input.price,
            "updated_at": Utc::now().to_rfc3339(),
        }
    };

    match rates(&client).update_one(doc! { "_id": rate.id }, update).await {
        Ok(_) => HttpResponse::Ok().body("Seasonal rate updated"),
        Err(err) => {
            log::error!("Failed to update seasonal rate: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to update seasonal rate")
        }
    }
}

/*
    DELETE /api/peak-season-rates/{id} (tenant, owner only)
*/
pub async fn delete_rate(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    claims: Claims,
) -> impl Responder {
    let client = data.into_inner();
    let rate_id = path.into_inner();

    let rate = match owned_rate(&client, &rate_id, &claims).await {
        Ok(rate) => rate,
        Err(resp) => return resp,
    };

    match rates(&client).delete_one(doc! { "_id": rate.id }).await {
        Ok(_) => HttpResponse::Ok().body("Seasonal rate deleted"),
        Err(err) => {
            log::error!("Failed to delete seasonal rate: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to delete seasonal rate")
        }
    }
}
