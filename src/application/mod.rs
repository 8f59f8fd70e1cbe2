//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide the operations HTTP
//! handlers call: CRUD for each entity plus membership sync.
//!
//! # Available Services
//!
//! - [`services::user_service::UserService`] - Users and their companies
//! - [`services::company_service::CompanyService`] - Companies and their users

pub mod services;
