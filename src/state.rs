//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{CompanyService, UserService};
use crate::domain::repositories::{CompanyRepository, UserRepository};

/// User service over type-erased repositories.
pub type DynUserService = UserService<dyn UserRepository, dyn CompanyRepository>;

/// Company service over type-erased repositories.
pub type DynCompanyService = CompanyService<dyn CompanyRepository, dyn UserRepository>;

/// Application state cloned into each request.
///
/// Repositories are trait objects so the same router runs on PostgreSQL in
/// production and on [`crate::infrastructure::memory::MemoryStore`] in tests.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<DynUserService>,
    pub company_service: Arc<DynCompanyService>,
    /// Default `page_size` for list endpoints.
    pub page_size: u32,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        companies: Arc<dyn CompanyRepository>,
        page_size: u32,
    ) -> Self {
        Self {
            user_service: Arc::new(UserService::new(users.clone(), companies.clone())),
            company_service: Arc::new(CompanyService::new(companies, users)),
            page_size,
        }
    }
}
