use actix_web::{web, HttpResponse, Responder};
use bson::{doc, oid::ObjectId};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::Client;
use std::sync::Arc;

use crate::db::mongo::RENTALS_DB;
use crate::middleware::auth::Claims;
use crate::models::peak_season_rate::PeakSeasonRate;
use crate::models::room::{Room, RoomInput};
use crate::routes::property::owned_property;

fn rooms(client: &Client) -> mongodb::Collection<Room> {
    client.database(RENTALS_DB).collection("Rooms")
}

/*
    GET /api/properties/{id}/rooms
*/
pub async fn get_property_rooms(
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
) -> impl Responder {
    let client = data.into_inner();

    let property_id: ObjectId = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid ID"),
    };

    match rooms(&client).find(doc! { "property_id": property_id }).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Room>>().await {
            Ok(results) => HttpResponse::Ok().json(results),
            Err(err) => {
                log::error!("Failed to collect rooms: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to process rooms")
            }
        },
        Err(err) => {
            log::error!("Failed to retrieve rooms: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve rooms")
        }
    }
}

/*
    GET /api/rooms/{id}
*/
pub async fn get_by_id(path: web::Path<String>, data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();

    let id: ObjectId = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid ID"),
    };

    match rooms(&client).find_one(doc! { "_id": id }).await {
        Ok(Some(room)) => HttpResponse::Ok().json(room),
        Ok(None) => HttpResponse::NotFound().body("Room not found"),
        Err(err) => {
            log::error!("Failed to retrieve room: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve room")
        }
    }
}

/// Fetches a room after checking the caller owns its parent property.
pub(crate) async fn owned_room(
    client: &Client,
    room_id: &str,
    claims: &Claims,
) -> Result<Room, HttpResponse> {
    let id = ObjectId::parse_str(room_id)
        .map_err(|_| HttpResponse::BadRequest().body("Invalid ID"))?;

    let room = rooms(client)
        .find_one(doc! { "_id": id })
        .await
        .map_err(|err| {
            log::error!("Failed to retrieve room: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve room")
        })?
        .ok_or_else(|| HttpResponse::NotFound().body("Room not found"))?;

    owned_property(client, &room.property_id.to_hex(), claims).await?;
    Ok(room)
}

/*
    POST /api/rooms (tenant)
*/
pub async fn create_room(
    data: web::Data<Arc<Client>>,
    input: web::Json<RoomInput>,
    claims: Claims,
) -> impl Responder {
    let client = data.into_inner();
    let input = input.into_inner();

    if input.price <= 0.0 {
        return HttpResponse::BadRequest().body("Room price must be positive");
    }
    if input.capacity == 0 {
        return HttpResponse::BadRequest().body("Room capacity must be positive");
    }

    // The property must exist and belong to the caller
    let property = match owned_property(&client, &input.property_id, &claims).await {
        Ok(property) => property,
        Err(resp) => return resp,
    };
    let property_id = match property.id {
        Some(id) => id,
        None => return HttpResponse::InternalServerError().body("Failed to create room"),
    };

    let time = Utc::now();
    let room = Room {
        id: None,
        property_id,
        name: input.name,
        description: input.description,
        price: input.price,
        capacity: input.capacity,
        created_at: Some(time),
        updated_at: Some(time),
    };

    match rooms(&client).insert_one(&room).await {
        Ok(result) => HttpResponse::Ok().json(doc! {
            "id": result.inserted_id.as_object_id().map(|id| id.to_hex()).unwrap_or_default()
        }),
        Err(err) => {
            log::error!("Failed to create room: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to create room")
        }
    }
}

/*
    PUT /api/rooms/{id} (tenant, owner only)
*/
pub async fn update_room(
    data: web::Data<Arc<Client>>,
    input: web::Json<RoomInput>,
    path: web::Path<String>,
    claims: Claims,
) -> impl Responder {
    let client = data.into_inner();
    let room_id = path.into_inner();

    let room = match owned_room(&client, &room_id, &claims).await {
        Ok(room) => room,
        Err(resp) => return resp,
    };

    let input = input.into_inner();
    if input.price <= 0.0 {
        return HttpResponse::BadRequest().body("Room price must be positive");
    }
    if input.capacity == 0 {
        return HttpResponse::BadRequest().body("Room capacity must be positive");
    }

    let update = doc! {
        "$set": {
            "name": &input.name,
            "description": &input.description,
            "price": input.price,
            "capacity": input.capacity,
            "updated_at": Utc::now().to_rfc3339(),
        }
    };

    match rooms(&client).update_one(doc! { "_id": room.id }, update).await {
        Ok(_) => HttpResponse::Ok().body("Room updated"),
        Err(err) => {
            log::error!("Failed to update room: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to update room")
        }
    }
}

/*
    DELETE /api/rooms/{id} (tenant, owner only)

    Seasonal rate windows go with the room.
*/
pub async fn delete_room(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    claims: Claims,
) -> impl Responder {
    let client = data.into_inner();
    let room_id = path.into_inner();

    let room = match owned_room(&client, &room_id, &claims).await {
        Ok(room) => room,
        Err(resp) => return resp,
    };

    let rates: mongodb::Collection<PeakSeasonRate> =
        client.database(RENTALS_DB).collection("PeakSeasonRates");

    if let Err(err) = rates.delete_many(doc! { "room_id": room.id }).await {
        log::error!("Failed to delete seasonal rates: {:?}", err);
        return HttpResponse::InternalServerError().body("Failed to delete room");
    }

    match rooms(&client).delete_one(doc! { "_id": room.id }).await {
        Ok(_) => HttpResponse::Ok().body("Room deleted"),
        Err(err) => {
            log::error!("Failed to delete room: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to delete room")
        }
    }
}
