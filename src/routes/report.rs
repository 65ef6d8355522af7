use actix_web::{web, HttpResponse, Responder};
use bson::{doc, oid::ObjectId};
use chrono::{Datelike, Utc};
use futures::TryStreamExt;
use mongodb::Client;
use serde::Deserialize;
use std::sync::Arc;

use crate::db::mongo::RENTALS_DB;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::property::Property;
use crate::models::transaction::Transaction;
use crate::services::report_service::ReportService;

#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    pub year: Option<i32>,
}

async fn tenant_property_ids(
    client: &Client,
    user: &AuthenticatedUser,
) -> Result<Vec<ObjectId>, HttpResponse> {
    let tenant_id = ObjectId::parse_str(&user.user_id)
        .map_err(|_| HttpResponse::BadRequest().body("Invalid user ID"))?;

    let properties: mongodb::Collection<Property> =
        client.database(RENTALS_DB).collection("Properties");

    let cursor = properties
        .find(doc! { "tenant_id": tenant_id })
        .await
        .map_err(|err| {
            log::error!("Failed to fetch properties: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to build report")
        })?;

    let properties = cursor
        .try_collect::<Vec<Property>>()
        .await
        .map_err(|err| {
            log::error!("Failed to collect properties: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to build report")
        })?;

    Ok(properties.into_iter().filter_map(|p| p.id).collect())
}

async fn tenant_transactions(
    client: &Client,
    property_ids: &[ObjectId],
) -> Result<Vec<Transaction>, HttpResponse> {
    let transactions: mongodb::Collection<Transaction> =
        client.database(RENTALS_DB).collection("Transactions");

    let cursor = transactions
        .find(doc! { "property_id": { "$in": property_ids } })
        .await
        .map_err(|err| {
            log::error!("Failed to fetch bookings: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to build report")
        })?;

    cursor.try_collect::<Vec<Transaction>>().await.map_err(|err| {
        log::error!("Failed to collect bookings: {:?}", err);
        HttpResponse::InternalServerError().body("Failed to build report")
    })
}

/*
    GET /api/tenant/reports/overview
*/
pub async fn overview(data: web::Data<Arc<Client>>, user: AuthenticatedUser) -> impl Responder {
    let client = data.into_inner();

    let property_ids = match tenant_property_ids(&client, &user).await {
        Ok(ids) => ids,
        Err(resp) => return resp,
    };

    let rooms: mongodb::Collection<bson::Document> =
        client.database(RENTALS_DB).collection("Rooms");
    let room_count = match rooms
        .count_documents(doc! { "property_id": { "$in": &property_ids } })
        .await
    {
        Ok(count) => count,
        Err(err) => {
            log::error!("Failed to count rooms: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to build report");
        }
    };

    let transactions = match tenant_transactions(&client, &property_ids).await {
        Ok(transactions) => transactions,
        Err(resp) => return resp,
    };

    let summary = ReportService::revenue_summary(&transactions);

    HttpResponse::Ok().json(serde_json::json!({
        "properties": property_ids.len(),
        "rooms": room_count,
        "transactions": summary.transactions,
        "confirmed_revenue": summary.confirmed_revenue,
        "confirmed_nights": summary.confirmed_nights,
    }))
}

/*
    GET /api/tenant/reports/monthly?year=YYYY
*/
pub async fn monthly(
    data: web::Data<Arc<Client>>,
    query: web::Query<MonthlyQuery>,
    user: AuthenticatedUser,
) -> impl Responder {
    let client = data.into_inner();
    let year = query.into_inner().year.unwrap_or_else(|| Utc::now().year());

    let property_ids = match tenant_property_ids(&client, &user).await {
        Ok(ids) => ids,
        Err(resp) => return resp,
    };

    let transactions = match tenant_transactions(&client, &property_ids).await {
        Ok(transactions) => transactions,
        Err(resp) => return resp,
    };

    let months = ReportService::monthly_revenue(&transactions, year);

    HttpResponse::Ok().json(serde_json::json!({
        "year": year,
        "months": months,
    }))
}
