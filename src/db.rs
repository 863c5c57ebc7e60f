pub mod user_repo;
pub use user_repo::UserRepository;
pub mod store_repo;
pub use store_repo::StoreRepository;
pub mod expense_repo;
pub use expense_repo::ExpenseRepository;
pub mod sales_repo;
pub use sales_repo::SalesRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
