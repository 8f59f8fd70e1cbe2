//! Repository trait for user data access.

use crate::domain::entities::{EntityRef, NewUser, User, UserPatch};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for users and their company memberships.
///
/// All lookups only see live (not soft-deleted) users unless stated otherwise.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryStore`] - In-memory implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user and, when `company_ids` is present, replaces its
    /// memberships with exactly that set. Both writes share one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Finds a live user by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Lists live users ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>, AppError>;

    /// Counts live users.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;

    /// Applies a partial update and, when `patch.company_ids` is present,
    /// replaces the memberships. Both writes share one transaction.
    ///
    /// Returns `Ok(None)` if no live user has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(&self, id: i64, patch: UserPatch) -> Result<Option<User>, AppError>;

    /// Sets `deleted_at = now()` and returns the row as it was just stored.
    ///
    /// Returns `Ok(None)` if the user does not exist or is already deleted.
    /// Membership rows are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn soft_delete(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Clears `deleted_at` on a soft-deleted user.
    ///
    /// Returns `Ok(None)` if the user does not exist or is not deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn restore(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Replaces the user's memberships with exactly `company_ids`.
    ///
    /// Returns `Ok(false)` if no live user has this id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn sync_companies(&self, id: i64, company_ids: &[i64]) -> Result<bool, AppError>;

    /// Loads the live companies of each user in `user_ids`.
    ///
    /// Returns `(user_id, company)` pairs ordered by company id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn companies_of(&self, user_ids: &[i64]) -> Result<Vec<(i64, EntityRef)>, AppError>;

    /// Returns the subset of `ids` that belong to live users.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn existing_ids(&self, ids: &[i64]) -> Result<Vec<i64>, AppError>;
}
