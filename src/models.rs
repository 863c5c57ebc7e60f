pub mod auth;
pub mod dashboard;
pub mod expense;
pub mod product;
pub mod report;
pub mod sales;
pub mod store;
