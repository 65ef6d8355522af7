use chrono::{DateTime, NaiveDate, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Nightly override for a room over an inclusive calendar-date window.
/// Windows on one room may overlap; pricing charges the highest match.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PeakSeasonRate {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub room_id: ObjectId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: f64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct PeakSeasonRateInput {
    pub room_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: f64,
}
