pub mod account;
pub mod pagination;
pub mod peak_season_rate;
pub mod property;
pub mod room;
pub mod search;
pub mod transaction;
