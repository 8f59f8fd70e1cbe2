//! Repository trait for company data access.

use crate::domain::entities::{Company, CompanyPatch, EntityRef, NewCompany};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for companies and their member users.
///
/// Mirror image of [`super::UserRepository`]; the same live-only rules apply.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCompanyRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryStore`] - In-memory implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Inserts a company and, when `user_ids` is present, replaces its members
    /// in the same transaction.
    async fn create(&self, new_company: NewCompany) -> Result<Company, AppError>;

    /// Finds a live company by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Company>, AppError>;

    /// Lists live companies ordered by id.
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Company>, AppError>;

    /// Counts live companies.
    async fn count(&self) -> Result<i64, AppError>;

    /// Applies a partial update; `Ok(None)` if no live company has this id.
    async fn update(&self, id: i64, patch: CompanyPatch) -> Result<Option<Company>, AppError>;

    /// Soft-deletes a company; `Ok(None)` if missing or already deleted.
    async fn soft_delete(&self, id: i64) -> Result<Option<Company>, AppError>;

    /// Restores a soft-deleted company; `Ok(None)` if missing or not deleted.
    async fn restore(&self, id: i64) -> Result<Option<Company>, AppError>;

    /// Replaces the company's members with exactly `user_ids`.
    ///
    /// Returns `Ok(false)` if no live company has this id.
    async fn sync_users(&self, id: i64, user_ids: &[i64]) -> Result<bool, AppError>;

    /// Loads the live users of each company, as `(company_id, user)` pairs
    /// ordered by user id.
    async fn users_of(&self, company_ids: &[i64]) -> Result<Vec<(i64, EntityRef)>, AppError>;

    /// Returns the subset of `ids` that belong to live companies.
    async fn existing_ids(&self, ids: &[i64]) -> Result<Vec<i64>, AppError>;
}
