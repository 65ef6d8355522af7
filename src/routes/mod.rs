pub mod account;
pub mod health;
pub mod peak_season_rate;
pub mod property;
pub mod report;
pub mod room;
pub mod transaction;
