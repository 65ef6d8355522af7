use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Property {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub tenant_id: ObjectId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub city: String,
    pub address: String,
    /// Image URLs; uploads are handled outside this service.
    pub images: Option<Vec<String>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct PropertyInput {
    pub name: String,
    pub description: String,
    pub category: String,
    pub city: String,
    pub address: String,
    pub images: Option<Vec<String>>,
}
