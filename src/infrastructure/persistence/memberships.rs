//! Shared SQL for the `user_company` membership table.
//!
//! Both repositories write the same table from opposite sides. The functions
//! here run on a caller-provided connection so they can join the caller's
//! transaction.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use crate::domain::entities::{Company, EntityRef, User};

/// Row shape shared by `users` and `companies`.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct NamedRow {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<NamedRow> for User {
    fn from(r: NamedRow) -> Self {
        User::new(r.id, r.name, r.created_at, r.updated_at, r.deleted_at)
    }
}

impl From<NamedRow> for Company {
    fn from(r: NamedRow) -> Self {
        Company::new(r.id, r.name, r.created_at, r.updated_at, r.deleted_at)
    }
}

/// A related entity keyed by the owner it was loaded for.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct RelatedRow {
    pub owner_id: i64,
    pub id: i64,
    pub name: String,
}

impl From<RelatedRow> for (i64, EntityRef) {
    fn from(r: RelatedRow) -> Self {
        (r.owner_id, EntityRef::new(r.id, r.name))
    }
}

/// Makes the companies of `user_id` exactly `company_ids`.
///
/// Pairs outside the target are deleted; missing pairs are inserted; pairs
/// already present are not touched.
pub(crate) async fn replace_companies_of_user(
    conn: &mut PgConnection,
    user_id: i64,
    company_ids: &[i64],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM user_company WHERE user_id = $1 AND company_id <> ALL($2)")
        .bind(user_id)
        .bind(company_ids)
        .execute(&mut *conn)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO user_company (user_id, company_id)
        SELECT $1, company_id FROM UNNEST($2::BIGINT[]) AS t(company_id)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(company_ids)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Makes the users of `company_id` exactly `user_ids`.
pub(crate) async fn replace_users_of_company(
    conn: &mut PgConnection,
    company_id: i64,
    user_ids: &[i64],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM user_company WHERE company_id = $1 AND user_id <> ALL($2)")
        .bind(company_id)
        .bind(user_ids)
        .execute(&mut *conn)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO user_company (user_id, company_id)
        SELECT user_id, $1 FROM UNNEST($2::BIGINT[]) AS t(user_id)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(company_id)
    .bind(user_ids)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
