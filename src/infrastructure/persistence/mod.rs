//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with bound
//! parameters. Schema lives in `migrations/`.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - Users and their company memberships
//! - [`PgCompanyRepository`] - Companies and their members

mod memberships;
pub mod pg_company_repository;
pub mod pg_user_repository;

pub use pg_company_repository::PgCompanyRepository;
pub use pg_user_repository::PgUserRepository;
