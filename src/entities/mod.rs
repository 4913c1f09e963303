pub mod collection;
pub mod driver;
pub mod expense;
pub mod inventory_level;
pub mod location;
pub mod rate_card;
pub mod sale;
pub mod stock_transfer;
pub mod trip;
pub mod user;
pub mod vehicle;
