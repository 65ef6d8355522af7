use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Room {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub property_id: ObjectId,
    pub name: String,
    pub description: String,
    /// Base nightly price; seasonal windows override it per night.
    pub price: f64,
    pub capacity: u32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct RoomInput {
    pub property_id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub capacity: u32,
}
