//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod companies;
pub mod health;
pub mod users;

pub use companies::{
    create_company_handler, delete_company_handler, list_companies_handler,
    show_company_handler, sync_company_users_handler, update_company_handler,
};
pub use health::health_handler;
pub use users::{
    create_user_handler, delete_user_handler, list_users_handler, show_user_handler,
    sync_user_companies_handler, update_user_handler,
};
