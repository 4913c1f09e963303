pub mod collections;
pub mod expenses;
pub mod fleet;
pub mod inventory;
pub mod locations;
pub mod rates;
pub mod sales;
pub mod transfers;
pub mod users;
