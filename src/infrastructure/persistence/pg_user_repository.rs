//! PostgreSQL implementation of user repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::memberships::{NamedRow, RelatedRow, replace_companies_of_user};
use crate::domain::entities::{EntityRef, NewUser, User, UserPatch};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

/// PostgreSQL repository for users.
///
/// Uses soft delete: `deleted_at IS NOT NULL` means deleted. Writes that touch
/// memberships run in a single transaction.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await?;

        let row: NamedRow = sqlx::query_as(
            r#"
            INSERT INTO users (name)
            VALUES ($1)
            RETURNING id, name, created_at, updated_at, deleted_at
            "#,
        )
        .bind(&new_user.name)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(company_ids) = &new_user.company_ids {
            replace_companies_of_user(&mut tx, row.id, company_ids).await?;
        }

        tx.commit().await?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let row: Option<NamedRow> = sqlx::query_as(
            r#"
            SELECT id, name, created_at, updated_at, deleted_at
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(User::from))
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>, AppError> {
        let rows: Vec<NamedRow> = sqlx::query_as(
            r#"
            SELECT id, name, created_at, updated_at, deleted_at
            FROM users
            WHERE deleted_at IS NULL
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE deleted_at IS NULL")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn update(&self, id: i64, patch: UserPatch) -> Result<Option<User>, AppError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<NamedRow> = sqlx::query_as(
            r#"
            UPDATE users SET
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

        if let Some(company_ids) = &patch.company_ids {
            replace_companies_of_user(&mut tx, id, company_ids).await?;
        }

        tx.commit().await?;
        Ok(Some(row.into()))
    }

    async fn soft_delete(&self, id: i64) -> Result<Option<User>, AppError> {
        let row: Option<NamedRow> = sqlx::query_as(
            r#"
            UPDATE users SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, name, created_at, updated_at, deleted_at
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(User::from))
    }

    async fn restore(&self, id: i64) -> Result<Option<User>, AppError> {
        let row: Option<NamedRow> = sqlx::query_as(
            r#"
            UPDATE users SET deleted_at = NULL, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NOT NULL
            RETURNING id, name, created_at, updated_at, deleted_at
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(User::from))
    }

    async fn sync_companies(&self, id: i64, company_ids: &[i64]) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        // Row lock keeps a concurrent delete from interleaving with the sync.
        let owner: Option<i64> =
            sqlx::query_scalar("SELECT id FROM users WHERE id = $1 AND deleted_at IS NULL FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        if owner.is_none() {
            tx.rollback().await?;
            return Ok(false);
        }

        replace_companies_of_user(&mut tx, id, company_ids).await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn companies_of(&self, user_ids: &[i64]) -> Result<Vec<(i64, EntityRef)>, AppError> {
        let rows: Vec<RelatedRow> = sqlx::query_as(
            r#"
            SELECT uc.user_id AS owner_id, c.id, c.name
            FROM user_company uc
            JOIN companies c ON c.id = uc.company_id
            WHERE uc.user_id = ANY($1) AND c.deleted_at IS NULL
            ORDER BY uc.user_id, c.id
            "#,
        )
        .bind(user_ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn existing_ids(&self, ids: &[i64]) -> Result<Vec<i64>, AppError> {
        let found: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM users WHERE id = ANY($1) AND deleted_at IS NULL")
                .bind(ids)
                .fetch_all(self.pool.as_ref())
                .await?;

        Ok(found)
    }
}
