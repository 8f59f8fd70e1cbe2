//! PostgreSQL implementation of company repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::memberships::{NamedRow, RelatedRow, replace_users_of_company};
use crate::domain::entities::{Company, CompanyPatch, EntityRef, NewCompany};
use crate::domain::repositories::CompanyRepository;
use crate::error::AppError;

/// PostgreSQL repository for companies.
///
/// Uses soft delete: `deleted_at IS NOT NULL` means deleted. Writes that touch
/// memberships run in a single transaction.
pub struct PgCompanyRepository {
    pool: Arc<PgPool>,
}

impl PgCompanyRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyRepository for PgCompanyRepository {
    async fn create(&self, new_company: NewCompany) -> Result<Company, AppError> {
        let mut tx = self.pool.begin().await?;

        let row: NamedRow = sqlx::query_as(
            r#"
            INSERT INTO companies (name)
            VALUES ($1)
            RETURNING id, name, created_at, updated_at, deleted_at
            "#,
        )
        .bind(&new_company.name)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(user_ids) = &new_company.user_ids {
            replace_users_of_company(&mut tx, row.id, user_ids).await?;
        }

        tx.commit().await?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Company>, AppError> {
        let row: Option<NamedRow> = sqlx::query_as(
            r#"
            SELECT id, name, created_at, updated_at, deleted_at
            FROM companies
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Company::from))
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Company>, AppError> {
        let rows: Vec<NamedRow> = sqlx::query_as(
            r#"
            SELECT id, name, created_at, updated_at, deleted_at
            FROM companies
            WHERE deleted_at IS NULL
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Company::from).collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM companies WHERE deleted_at IS NULL")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn update(&self, id: i64, patch: CompanyPatch) -> Result<Option<Company>, AppError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<NamedRow> = sqlx::query_as(
            r#"
            UPDATE companies SET
                name       = COALESCE($2::TEXT, name),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, name, created_at, updated_at, deleted_at
            "#,
        )
        .bind(id)
        .bind(patch.name.as_deref())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };

        if let Some(user_ids) = &patch.user_ids {
            replace_users_of_company(&mut tx, id, user_ids).await?;
        }

        tx.commit().await?;
        Ok(Some(row.into()))
    }

    async fn soft_delete(&self, id: i64) -> Result<Option<Company>, AppError> {
        let row: Option<NamedRow> = sqlx::query_as(
            r#"
            UPDATE companies SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, name, created_at, updated_at, deleted_at
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Company::from))
    }

    async fn restore(&self, id: i64) -> Result<Option<Company>, AppError> {
        let row: Option<NamedRow> = sqlx::query_as(
            r#"
            UPDATE companies SET deleted_at = NULL, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NOT NULL
            RETURNING id, name, created_at, updated_at, deleted_at
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Company::from))
    }

    async fn sync_users(&self, id: i64, user_ids: &[i64]) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let owner: Option<i64> =
            sqlx::query_scalar("SELECT id FROM companies WHERE id = $1 AND deleted_at IS NULL FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        if owner.is_none() {
            tx.rollback().await?;
            return Ok(false);
        }

        replace_users_of_company(&mut tx, id, user_ids).await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn users_of(&self, company_ids: &[i64]) -> Result<Vec<(i64, EntityRef)>, AppError> {
        let rows: Vec<RelatedRow> = sqlx::query_as(
            r#"
            SELECT uc.company_id AS owner_id, u.id, u.name
            FROM user_company uc
            JOIN users u ON u.id = uc.user_id
            WHERE uc.company_id = ANY($1) AND u.deleted_at IS NULL
            ORDER BY uc.company_id, u.id
            "#,
        )
        .bind(company_ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn existing_ids(&self, ids: &[i64]) -> Result<Vec<i64>, AppError> {
        let found: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM companies WHERE id = ANY($1) AND deleted_at IS NULL")
                .bind(ids)
                .fetch_all(self.pool.as_ref())
                .await?;

        Ok(found)
    }
}
