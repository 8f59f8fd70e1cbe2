//! Repository trait definitions for the domain layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - PostgreSQL implementations live in `crate::infrastructure::persistence`
//! - An in-memory implementation lives in `crate::infrastructure::memory`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`UserRepository`] - Users and their companies
//! - [`CompanyRepository`] - Companies and their users
//!
//! Both sides write the same `user_company` membership table.

pub mod company_repository;
pub mod user_repository;

pub use company_repository::CompanyRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use company_repository::MockCompanyRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
