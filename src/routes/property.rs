use actix_web::{web, HttpResponse, Responder};
use bson::{doc, oid::ObjectId, Document};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::Client;
use std::sync::Arc;

use crate::db::mongo::RENTALS_DB;
use crate::middleware::auth::Claims;
use crate::models::account::UserRole;
use crate::models::pagination::{PageQuery, Paginated};
use crate::models::peak_season_rate::PeakSeasonRate;
use crate::models::property::{Property, PropertyInput};
use crate::models::room::Room;
use crate::models::search::PropertySearchQuery;

fn properties(client: &Client) -> mongodb::Collection<Property> {
    client.database(RENTALS_DB).collection("Properties")
}

fn search_filter(query: &PropertySearchQuery) -> Document {
    let mut filter = doc! {};
    if let Some(search) = &query.search {
        if !search.is_empty() {
            filter.insert("name", doc! { "$regex": search, "$options": "i" });
        }
    }
    if let Some(city) = &query.city {
        filter.insert("city", city);
    }
    if let Some(category) = &query.category {
        filter.insert("category", category);
    }
    filter
}

/*
    GET /api/properties
*/
pub async fn get_properties(
    query: web::Query<PropertySearchQuery>,
    data: web::Data<Arc<Client>>,
) -> impl Responder {
    let client = data.into_inner();
    let collection = properties(&client);

    let query = query.into_inner();
    let filter = search_filter(&query);
    let page = PageQuery {
        page: query.page,
        take: query.take,
    };

    let total = match collection.count_documents(filter.clone()).await {
        Ok(total) => total,
        Err(err) => {
            log::error!("Failed to count properties: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to retrieve properties");
        }
    };

    let cursor = collection
        .find(filter)
        .sort(doc! { "created_at": -1 })
        .skip(page.skip())
        .limit(page.take())
        .await;

    match cursor {
        Ok(cursor) => match cursor.try_collect::<Vec<Property>>().await {
            Ok(results) => HttpResponse::Ok().json(Paginated::new(results, &page, total)),
            Err(err) => {
                log::error!("Failed to collect properties: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to process properties")
            }
        },
        Err(err) => {
            log::error!("Failed to retrieve properties: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve properties")
        }
    }
}

/*
    GET /api/properties/{id}
*/
pub async fn get_by_id(path: web::Path<String>, data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection = properties(&client);

    let id: ObjectId = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid ID"),
    };

    match collection.find_one(doc! { "_id": id }).await {
        Ok(Some(property)) => HttpResponse::Ok().json(property),
        Ok(None) => HttpResponse::NotFound().body("Property not found"),
        Err(err) => {
            log::error!("Failed to retrieve property: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve property")
        }
    }
}

/*
    POST /api/properties (tenant)
*/
pub async fn create_property(
    data: web::Data<Arc<Client>>,
    input: web::Json<PropertyInput>,
    claims: Claims,
) -> impl Responder {
    let client = data.into_inner();
    let collection = properties(&client);

    let tenant_id = match ObjectId::parse_str(&claims.user_id) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid user ID"),
    };

    let input = input.into_inner();
    if input.name.trim().is_empty() {
        return HttpResponse::BadRequest().body("Property name must not be empty");
    }

    let time = Utc::now();
    let property = Property {
        id: None,
        tenant_id,
        name: input.name,
        description: input.description,
        category: input.category,
        city: input.city,
        address: input.address,
        images: input.images,
        created_at: Some(time),
        updated_at: Some(time),
    };

    match collection.insert_one(&property).await {
        Ok(result) => HttpResponse::Ok().json(doc! {
            "id": result.inserted_id.as_object_id().map(|id| id.to_hex()).unwrap_or_default()
        }),
        Err(err) => {
            log::error!("Failed to create property: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to create property")
        }
    }
}

/// Fetches the property and enforces that the caller owns it (or is admin).
/// Returns the property on success, an HTTP error response otherwise.
pub(crate) async fn owned_property(
    client: &Client,
    property_id: &str,
    claims: &Claims,
) -> Result<Property, HttpResponse> {
    let id = ObjectId::parse_str(property_id)
        .map_err(|_| HttpResponse::BadRequest().body("Invalid ID"))?;

    let property = properties(client)
        .find_one(doc! { "_id": id })
        .await
        .map_err(|err| {
            log::error!("Failed to retrieve property: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve property")
        })?
        .ok_or_else(|| HttpResponse::NotFound().body("Property not found"))?;

    let role = claims
        .role
        .as_deref()
        .map(UserRole::from_claim)
        .unwrap_or(UserRole::User);

    if role != UserRole::Admin && property.tenant_id.to_hex() != claims.user_id {
        return Err(HttpResponse::Forbidden().body("Forbidden"));
    }
    Ok(property)
}

/*
    PUT /api/properties/{id} (tenant, owner only)
*/
pub async fn update_property(
    data: web::Data<Arc<Client>>,
    input: web::Json<PropertyInput>,
    path: web::Path<String>,
    claims: Claims,
) -> impl Responder {
    let client = data.into_inner();
    let property_id = path.into_inner();

    let property = match owned_property(&client, &property_id, &claims).await {
        Ok(property) => property,
        Err(resp) => return resp,
    };

    let input = input.into_inner();
    if input.name.trim().is_empty() {
        return HttpResponse::BadRequest().body("Property name must not be empty");
    }

    let update = doc! {
        "$set": {
            "name": &input.name,
            "description": &input.description,
            "category": &input.category,
            "city": &input.city,
            "address": &input.address,
            "images": input.images.as_deref().unwrap_or_default(),
            "updated_at": Utc::now().to_rfc3339(),
        }
    };

    match properties(&client)
        .update_one(doc! { "_id": property.id }, update)
        .await
    {
        Ok(_) => HttpResponse::Ok().body("Property updated"),
        Err(err) => {
            log::error!("Failed to update property: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to update property")
        }
    }
}

/*
    DELETE /api/properties/{id} (tenant, owner only)

    Rooms and their seasonal rate windows go with the property.
*/
pub async fn delete_property(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    claims: Claims,
) -> impl Responder {
    let client = data.into_inner();
    let property_id = path.into_inner();

    let property = match owned_property(&client, &property_id, &claims).await {
        Ok(property) => property,
        Err(resp) => return resp,
    };

    let rooms: mongodb::Collection<Room> = client.database(RENTALS_DB).collection("Rooms");
    let rates: mongodb::Collection<PeakSeasonRate> =
        client.database(RENTALS_DB).collection("PeakSeasonRates");

    let room_ids: Vec<ObjectId> = match rooms.find(doc! { "property_id": property.id }).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Room>>().await {
            Ok(rooms) => rooms.into_iter().filter_map(|room| room.id).collect(),
            Err(err) => {
                log::error!("Failed to collect rooms: {:?}", err);
                return HttpResponse::InternalServerError().body("Failed to delete property");
            }
        },
        Err(err) => {
            log::error!("Failed to fetch rooms: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to delete property");
        }
    };

    if !room_ids.is_empty() {
        if let Err(err) = rates
            .delete_many(doc! { "room_id": { "$in": &room_ids } })
            .await
        {
            log::error!("Failed to delete seasonal rates: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to delete property");
        }
    }
    if let Err(err) = rooms.delete_many(doc! { "property_id": property.id }).await {
        log::error!("Failed to delete rooms: {:?}", err);
        return HttpResponse::InternalServerError().body("Failed to delete property");
    }

    match properties(&client)
        .delete_one(doc! { "_id": property.id })
        .await
    {
        Ok(_) => HttpResponse::Ok().body("Property deleted"),
        Err(err) => {
            log::error!("Failed to delete property: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to delete property")
        }
    }
}
