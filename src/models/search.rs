use serde::Deserialize;

/// Query parameters accepted by the public property listing.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertySearchQuery {
    /// Case-insensitive match against the property name.
    pub search: Option<String>,
    pub city: Option<String>,
    pub category: Option<String>,
    pub page: Option<u64>,
    pub take: Option<i64>,
}
