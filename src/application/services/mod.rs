//! Business logic services for the application layer.

pub mod company_service;
pub mod user_service;

pub use company_service::CompanyService;
pub use user_service::UserService;
