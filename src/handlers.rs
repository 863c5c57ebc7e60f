pub mod auth;
pub mod dashboard;
pub mod expenses;
pub mod products;
pub mod reports;
pub mod sales;
pub mod stores;
