pub mod auth;
pub mod breakeven;
pub mod dashboard_service;
pub mod expense_service;
pub mod inventory_service;
pub mod period;
pub mod report_service;
pub mod sales_service;
pub mod spreadsheet;
pub mod store_service;
