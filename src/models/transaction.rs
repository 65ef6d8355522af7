use chrono::{DateTime, NaiveDate, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::account::UserRole;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Cancelled,
    Rejected,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Confirmed => "confirmed",
            TransactionStatus::Cancelled => "cancelled",
            TransactionStatus::Rejected => "rejected",
        }
    }

    /// Whether `actor` may move a booking from `self` to `next`.
    /// The property's tenant settles pending bookings either way; the guest
    /// may only withdraw a pending one. Terminal states never change.
    pub fn can_transition(&self, next: TransactionStatus, actor: &UserRole) -> bool {
        if *self != TransactionStatus::Pending {
            return false;
        }
        match next {
            TransactionStatus::Confirmed | TransactionStatus::Rejected => {
                matches!(actor, UserRole::Tenant | UserRole::Admin)
            }
            TransactionStatus::Cancelled => {
                matches!(actor, UserRole::User | UserRole::Admin)
            }
            TransactionStatus::Pending => false,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Transaction {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub room_id: ObjectId,
    pub property_id: ObjectId,
    pub booking_code: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: u32,
    pub total_price: f64,
    pub peak_season_days: u32,
    pub status: TransactionStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct StayInput {
    pub room_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateInput {
    pub status: TransactionStatus,
}
