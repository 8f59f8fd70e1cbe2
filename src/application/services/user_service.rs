//! User management service.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{EntityRef, NewUser, User, UserDetails, UserPatch};
use crate::domain::repositories::{CompanyRepository, UserRepository};
use crate::error::AppError;
use crate::utils::id_set::{missing_ids, normalize_ids};
use serde_json::json;

/// Service orchestrating user CRUD and company membership sync.
///
/// Validation of request shape happens in the API layer; this service checks
/// that referenced companies exist before anything is written.
pub struct UserService<U: UserRepository + ?Sized, C: CompanyRepository + ?Sized> {
    users: Arc<U>,
    companies: Arc<C>,
}

impl<U: UserRepository + ?Sized, C: CompanyRepository + ?Sized> UserService<U, C> {
    /// Creates a new user service.
    pub fn new(users: Arc<U>, companies: Arc<C>) -> Self {
        Self { users, companies }
    }

    /// Returns one page of live users with their companies attached, plus the
    /// total number of live users.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_users(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<UserDetails>, i64), AppError> {
        let users = self.users.list(offset, limit).await?;
        let total = self.users.count().await?;

        let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
        let mut by_user: HashMap<i64, Vec<EntityRef>> = HashMap::new();
        if !ids.is_empty() {
            for (user_id, company) in self.users.companies_of(&ids).await? {
                by_user.entry(user_id).or_default().push(company);
            }
        }

        let items = users
            .into_iter()
            .map(|user| {
                let companies = by_user.remove(&user.id).unwrap_or_default();
                UserDetails::with_companies(user, companies)
            })
            .collect();

        Ok((items, total))
    }

    /// Creates a user, syncing memberships only when `company_ids` is present.
    ///
    /// The returned details carry the companies exactly when a sync happened.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a referenced company does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn create_user(
        &self,
        name: String,
        company_ids: Option<Vec<i64>>,
    ) -> Result<UserDetails, AppError> {
        let company_ids = match company_ids {
            Some(ids) => Some(self.ensure_companies_exist(ids).await?),
            None => None,
        };
        let synced = company_ids.is_some();

        let user = self.users.create(NewUser { name, company_ids }).await?;
        tracing::info!(user_id = user.id, synced, "User created");

        if synced {
            self.attach_companies(user).await
        } else {
            Ok(UserDetails::bare(user))
        }
    }

    /// Loads a live user with its companies.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live user has this id.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_user(&self, id: i64) -> Result<UserDetails, AppError> {
        let user = self.find_live(id).await?;
        self.attach_companies(user).await
    }

    /// Merges the provided fields into the user and re-syncs memberships when
    /// `patch.company_ids` is present.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a referenced company does not exist.
    /// Returns [`AppError::NotFound`] if no live user has this id.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn update_user(&self, id: i64, patch: UserPatch) -> Result<UserDetails, AppError> {
        let company_ids = match patch.company_ids {
            Some(ids) => Some(self.ensure_companies_exist(ids).await?),
            None => None,
        };
        let patch = UserPatch {
            name: patch.name,
            company_ids,
        };

        let user = self
            .users
            .update(id, patch)
            .await?
            .ok_or_else(|| user_not_found(id))?;
        tracing::info!(user_id = id, "User updated");

        self.attach_companies(user).await
    }

    /// Soft-deletes a user and returns it as it was stored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user is missing or already deleted.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn delete_user(&self, id: i64) -> Result<User, AppError> {
        let user = self
            .users
            .soft_delete(id)
            .await?
            .ok_or_else(|| user_not_found(id))?;
        tracing::info!(user_id = id, "User soft-deleted");

        Ok(user)
    }

    /// Clears the soft-delete marker of a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user is missing or not deleted.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn restore_user(&self, id: i64) -> Result<User, AppError> {
        let user = self.users.restore(id).await?.ok_or_else(|| {
            AppError::not_found("Deleted user not found", json!({ "id": id }))
        })?;
        tracing::info!(user_id = id, "User restored");

        Ok(user)
    }

    /// Replaces the user's companies with exactly `company_ids`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a referenced company does not exist.
    /// Returns [`AppError::NotFound`] if no live user has this id.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn sync_companies(
        &self,
        id: i64,
        company_ids: Vec<i64>,
    ) -> Result<UserDetails, AppError> {
        let company_ids = self.ensure_companies_exist(company_ids).await?;

        if !self.users.sync_companies(id, &company_ids).await? {
            return Err(user_not_found(id));
        }
        tracing::info!(user_id = id, companies = company_ids.len(), "User companies synced");

        self.get_user(id).await
    }

    /// Counts live users.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn count_users(&self) -> Result<i64, AppError> {
        self.users.count().await
    }

    async fn find_live(&self, id: i64) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| user_not_found(id))
    }

    async fn attach_companies(&self, user: User) -> Result<UserDetails, AppError> {
        let companies = self
            .users
            .companies_of(&[user.id])
            .await?
            .into_iter()
            .map(|(_, company)| company)
            .collect();

        Ok(UserDetails::with_companies(user, companies))
    }

    /// Normalizes `ids` and checks that each refers to a live company.
    async fn ensure_companies_exist(&self, ids: Vec<i64>) -> Result<Vec<i64>, AppError> {
        let ids = normalize_ids(ids);
        if ids.is_empty() {
            return Ok(ids);
        }

        let existing = normalize_ids(self.companies.existing_ids(&ids).await?);
        let missing = missing_ids(&ids, &existing);
        if !missing.is_empty() {
            return Err(AppError::invalid_field(
                "companies",
                missing
                    .iter()
                    .map(|id| format!("The selected company {} is invalid", id))
                    .collect(),
            ));
        }

        Ok(ids)
    }
}

fn user_not_found(id: i64) -> AppError {
    AppError::not_found("User not found", json!({ "id": id }))
}
