//! Company management service.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{Company, CompanyDetails, CompanyPatch, EntityRef, NewCompany};
use crate::domain::repositories::{CompanyRepository, UserRepository};
use crate::error::AppError;
use crate::utils::id_set::{missing_ids, normalize_ids};
use serde_json::json;

/// Service orchestrating company CRUD and member sync.
///
/// Mirror of [`super::UserService`] from the company side of the membership.
pub struct CompanyService<C: CompanyRepository + ?Sized, U: UserRepository + ?Sized> {
    companies: Arc<C>,
    users: Arc<U>,
}

impl<C: CompanyRepository + ?Sized, U: UserRepository + ?Sized> CompanyService<C, U> {
    /// Creates a new company service.
    pub fn new(companies: Arc<C>, users: Arc<U>) -> Self {
        Self { companies, users }
    }

    /// Returns one page of live companies with their users, plus the total.
    pub async fn list_companies(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<CompanyDetails>, i64), AppError> {
        let companies = self.companies.list(offset, limit).await?;
        let total = self.companies.count().await?;

        let ids: Vec<i64> = companies.iter().map(|c| c.id).collect();
        let mut by_company: HashMap<i64, Vec<EntityRef>> = HashMap::new();
        if !ids.is_empty() {
            for (company_id, user) in self.companies.users_of(&ids).await? {
                by_company.entry(company_id).or_default().push(user);
            }
        }

        let items = companies
            .into_iter()
            .map(|company| {
                let users = by_company.remove(&company.id).unwrap_or_default();
                CompanyDetails::with_users(company, users)
            })
            .collect();

        Ok((items, total))
    }

    /// Creates a company, syncing members only when `user_ids` is present.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a referenced user does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn create_company(
        &self,
        name: String,
        user_ids: Option<Vec<i64>>,
    ) -> Result<CompanyDetails, AppError> {
        let user_ids = match user_ids {
            Some(ids) => Some(self.ensure_users_exist(ids).await?),
            None => None,
        };
        let synced = user_ids.is_some();

        let company = self.companies.create(NewCompany { name, user_ids }).await?;
        tracing::info!(company_id = company.id, synced, "Company created");

        if synced {
            self.attach_users(company).await
        } else {
            Ok(CompanyDetails::bare(company))
        }
    }

    /// Loads a live company with its users.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live company has this id.
    pub async fn get_company(&self, id: i64) -> Result<CompanyDetails, AppError> {
        let company = self
            .companies
            .find_by_id(id)
            .await?
            .ok_or_else(|| company_not_found(id))?;

        self.attach_users(company).await
    }

    /// Merges the provided fields and re-syncs members when `patch.user_ids`
    /// is present.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a referenced user does not exist.
    /// Returns [`AppError::NotFound`] if no live company has this id.
    pub async fn update_company(
        &self,
        id: i64,
        patch: CompanyPatch,
    ) -> Result<CompanyDetails, AppError> {
        let user_ids = match patch.user_ids {
            Some(ids) => Some(self.ensure_users_exist(ids).await?),
            None => None,
        };
        let patch = CompanyPatch {
            name: patch.name,
            user_ids,
        };

        let company = self
            .companies
            .update(id, patch)
            .await?
            .ok_or_else(|| company_not_found(id))?;
        tracing::info!(company_id = id, "Company updated");

        self.attach_users(company).await
    }

    /// Soft-deletes a company and returns it as it was stored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the company is missing or already deleted.
    pub async fn delete_company(&self, id: i64) -> Result<Company, AppError> {
        let company = self
            .companies
            .soft_delete(id)
            .await?
            .ok_or_else(|| company_not_found(id))?;
        tracing::info!(company_id = id, "Company soft-deleted");

        Ok(company)
    }

    /// Clears the soft-delete marker of a company.
    pub async fn restore_company(&self, id: i64) -> Result<Company, AppError> {
        let company = self.companies.restore(id).await?.ok_or_else(|| {
            AppError::not_found("Deleted company not found", json!({ "id": id }))
        })?;
        tracing::info!(company_id = id, "Company restored");

        Ok(company)
    }

    /// Replaces the company's users with exactly `user_ids`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a referenced user does not exist.
    /// Returns [`AppError::NotFound`] if no live company has this id.
    pub async fn sync_users(
        &self,
        id: i64,
        user_ids: Vec<i64>,
    ) -> Result<CompanyDetails, AppError> {
        let user_ids = self.ensure_users_exist(user_ids).await?;

        if !self.companies.sync_users(id, &user_ids).await? {
            return Err(company_not_found(id));
        }
        tracing::info!(company_id = id, users = user_ids.len(), "Company users synced");

        self.get_company(id).await
    }

    pub async fn count_companies(&self) -> Result<i64, AppError> {
        self.companies.count().await
    }

    async fn attach_users(&self, company: Company) -> Result<CompanyDetails, AppError> {
        let users = self
            .companies
            .users_of(&[company.id])
            .await?
            .into_iter()
            .map(|(_, user)| user)
            .collect();

        Ok(CompanyDetails::with_users(company, users))
    }

    async fn ensure_users_exist(&self, ids: Vec<i64>) -> Result<Vec<i64>, AppError> {
        let ids = normalize_ids(ids);
        if ids.is_empty() {
            return Ok(ids);
        }

        let existing = normalize_ids(self.users.existing_ids(&ids).await?);
        let missing = missing_ids(&ids, &existing);
        if !missing.is_empty() {
            return Err(AppError::invalid_field(
                "users",
                missing
                    .iter()
                    .map(|id| format!("The selected user {} is invalid", id))
                    .collect(),
            ));
        }

        Ok(ids)
    }
}

fn company_not_found(id: i64) -> AppError {
    AppError::not_found("Company not found", json!({ "id": id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockCompanyRepository, MockUserRepository};
    use chrono::Utc;

    fn create_test_company(id: i64, name: &str) -> Company {
        Company::new(id, name.to_string(), Utc::now(), Utc::now(), None)
    }

    fn service(
        companies: MockCompanyRepository,
        users: MockUserRepository,
    ) -> CompanyService<MockCompanyRepository, MockUserRepository> {
        CompanyService::new(Arc::new(companies), Arc::new(users))
    }

    #[tokio::test]
    async fn test_create_company_without_users() {
        let mut companies = MockCompanyRepository::new();
        companies
            .expect_create()
            .withf(|new_company| new_company.name == "Acme" && new_company.user_ids.is_none())
            .times(1)
            .returning(|_| Ok(create_test_company(1, "Acme")));
        companies.expect_users_of().never();

        let details = service(companies, MockUserRepository::new())
            .create_company("Acme".to_string(), None)
            .await
            .unwrap();

        assert_eq!(details.company.name, "Acme");
        assert!(details.users.is_none());
    }

    #[tokio::test]
    async fn test_sync_users_rejects_unknown_users() {
        let mut users = MockUserRepository::new();
        users.expect_existing_ids().returning(|_| Ok(vec![7]));

        let mut companies = MockCompanyRepository::new();
        companies.expect_sync_users().never();

        let err = service(companies, users)
            .sync_users(1, vec![7, 8])
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(
            err.to_error_info().details["users"][0],
            "The selected user 8 is invalid"
        );
    }

    #[tokio::test]
    async fn test_sync_users_returns_company_with_users() {
        let mut users = MockUserRepository::new();
        users
            .expect_existing_ids()
            .returning(|ids| Ok(ids.to_vec()));

        let mut companies = MockCompanyRepository::new();
        companies
            .expect_sync_users()
            .withf(|id, ids| *id == 1 && ids.to_vec() == vec![7, 8])
            .times(1)
            .returning(|_, _| Ok(true));
        companies
            .expect_find_by_id()
            .returning(|id| Ok(Some(create_test_company(id, "Acme"))));
        companies.expect_users_of().returning(|_| {
            Ok(vec![
                (1, EntityRef::new(7, "Ada".to_string())),
                (1, EntityRef::new(8, "Grace".to_string())),
            ])
        });

        let details = service(companies, users)
            .sync_users(1, vec![8, 7])
            .await
            .unwrap();

        let members = details.users.unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].id, 7);
    }

    #[tokio::test]
    async fn test_sync_users_with_empty_list_skips_lookup() {
        let mut users = MockUserRepository::new();
        users.expect_existing_ids().never();

        let mut companies = MockCompanyRepository::new();
        companies
            .expect_sync_users()
            .withf(|_, ids| ids.is_empty())
            .returning(|_, _| Ok(true));
        companies
            .expect_find_by_id()
            .returning(|id| Ok(Some(create_test_company(id, "Acme"))));
        companies.expect_users_of().returning(|_| Ok(vec![]));

        let details = service(companies, users)
            .sync_users(1, vec![])
            .await
            .unwrap();

        assert_eq!(details.users, Some(vec![]));
    }

    #[tokio::test]
    async fn test_delete_company_not_found() {
        let mut companies = MockCompanyRepository::new();
        companies.expect_soft_delete().returning(|_| Ok(None));

        let result = service(companies, MockUserRepository::new())
            .delete_company(3)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_restore_company_not_deleted() {
        let mut companies = MockCompanyRepository::new();
        companies.expect_restore().returning(|_| Ok(None));

        let result = service(companies, MockUserRepository::new())
            .restore_company(3)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }
}
