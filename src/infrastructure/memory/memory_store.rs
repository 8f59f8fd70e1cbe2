//! In-process implementation of both repositories.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::entities::{
    Company, CompanyPatch, EntityRef, NewCompany, NewUser, User, UserPatch,
};
use crate::domain::repositories::{CompanyRepository, UserRepository};
use crate::error::AppError;

/// Stored row: the same shape backs both tables.
#[derive(Debug, Clone)]
struct Row {
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl Row {
    fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            name,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }

    fn to_user(&self, id: i64) -> User {
        User::new(
            id,
            self.name.clone(),
            self.created_at,
            self.updated_at,
            self.deleted_at,
        )
    }

    fn to_company(&self, id: i64) -> Company {
        Company::new(
            id,
            self.name.clone(),
            self.created_at,
            self.updated_at,
            self.deleted_at,
        )
    }
}

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i64, Row>,
    next_id: i64,
}

impl Table {
    fn insert(&mut self, name: String) -> i64 {
        self.next_id += 1;
        self.rows.insert(self.next_id, Row::new(name));
        self.next_id
    }

    fn live(&self, id: i64) -> Option<&Row> {
        self.rows.get(&id).filter(|r| r.is_live())
    }

    fn live_mut(&mut self, id: i64) -> Option<&mut Row> {
        self.rows.get_mut(&id).filter(|r| r.is_live())
    }

    fn page(&self, offset: i64, limit: i64) -> Vec<(i64, &Row)> {
        self.rows
            .iter()
            .filter(|(_, r)| r.is_live())
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|(id, r)| (*id, r))
            .collect()
    }

    fn count(&self) -> i64 {
        self.rows.values().filter(|r| r.is_live()).count() as i64
    }

    fn existing(&self, ids: &[i64]) -> Vec<i64> {
        ids.iter()
            .copied()
            .filter(|id| self.live(*id).is_some())
            .collect()
    }

    fn soft_delete(&mut self, id: i64) -> Option<&Row> {
        let row = self.live_mut(id)?;
        row.deleted_at = Some(Utc::now());
        Some(row)
    }

    fn restore(&mut self, id: i64) -> Option<&Row> {
        let row = self.rows.get_mut(&id).filter(|r| !r.is_live())?;
        row.deleted_at = None;
        row.updated_at = Utc::now();
        Some(row)
    }
}

#[derive(Debug, Default)]
struct Tables {
    users: Table,
    companies: Table,
    /// `(user_id, company_id)` pairs.
    memberships: BTreeSet<(i64, i64)>,
}

impl Tables {
    fn replace_companies_of_user(&mut self, user_id: i64, company_ids: &[i64]) {
        self.memberships
            .retain(|(u, c)| *u != user_id || company_ids.contains(c));
        for company_id in company_ids {
            self.memberships.insert((user_id, *company_id));
        }
    }

    fn replace_users_of_company(&mut self, company_id: i64, user_ids: &[i64]) {
        self.memberships
            .retain(|(u, c)| *c != company_id || user_ids.contains(u));
        for user_id in user_ids {
            self.memberships.insert((*user_id, company_id));
        }
    }
}

/// Repository backed by process memory, with the same semantics as the
/// PostgreSQL repositories: live filtering, id ordering and set-replacing sync.
///
/// Clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        debug!("Using in-memory store");
        Self::default()
    }

    /// All membership pairs as `(user_id, company_id)`, ordered.
    pub async fn memberships(&self) -> Vec<(i64, i64)> {
        self.tables.lock().await.memberships.iter().copied().collect()
    }

    /// Returns a user regardless of its soft-delete state.
    pub async fn user_with_deleted(&self, id: i64) -> Option<User> {
        self.tables
            .lock()
            .await
            .users
            .rows
            .get(&id)
            .map(|r| r.to_user(id))
    }

    /// Returns a company regardless of its soft-delete state.
    pub async fn company_with_deleted(&self, id: i64) -> Option<Company> {
        self.tables
            .lock()
            .await
            .companies
            .rows
            .get(&id)
            .map(|r| r.to_company(id))
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.lock().await;
        let id = tables.users.insert(new_user.name);
        if let Some(company_ids) = &new_user.company_ids {
            tables.replace_companies_of_user(id, company_ids);
        }
        Ok(tables.users.rows[&id].to_user(id))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.live(id).map(|r| r.to_user(id)))
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .page(offset, limit)
            .into_iter()
            .map(|(id, r)| r.to_user(id))
            .collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.tables.lock().await.users.count())
    }

    async fn update(&self, id: i64, patch: UserPatch) -> Result<Option<User>, AppError> {
        let mut tables = self.tables.lock().await;
        let Some(row) = tables.users.live_mut(id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            row.name = name;
        }
        row.updated_at = Utc::now();
        let user = row.to_user(id);

        if let Some(company_ids) = &patch.company_ids {
            tables.replace_companies_of_user(id, company_ids);
        }
        Ok(Some(user))
    }

    async fn soft_delete(&self, id: i64) -> Result<Option<User>, AppError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.users.soft_delete(id).map(|r| r.to_user(id)))
    }

    async fn restore(&self, id: i64) -> Result<Option<User>, AppError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.users.restore(id).map(|r| r.to_user(id)))
    }

    async fn sync_companies(&self, id: i64, company_ids: &[i64]) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().await;
        if tables.users.live(id).is_none() {
            return Ok(false);
        }
        tables.replace_companies_of_user(id, company_ids);
        Ok(true)
    }

    async fn companies_of(&self, user_ids: &[i64]) -> Result<Vec<(i64, EntityRef)>, AppError> {
        let tables = self.tables.lock().await;
        let mut pairs: Vec<(i64, EntityRef)> = tables
            .memberships
            .iter()
            .filter(|(u, _)| user_ids.contains(u))
            .filter_map(|(u, c)| {
                tables
                    .companies
                    .live(*c)
                    .map(|r| (*u, r.to_company(*c).to_ref()))
            })
            .collect();
        pairs.sort_by_key(|(owner, related)| (*owner, related.id));
        Ok(pairs)
    }

    async fn existing_ids(&self, ids: &[i64]) -> Result<Vec<i64>, AppError> {
        Ok(self.tables.lock().await.users.existing(ids))
    }
}

#[async_trait]
impl CompanyRepository for MemoryStore {
    async fn create(&self, new_company: NewCompany) -> Result<Company, AppError> {
        let mut tables = self.tables.lock().await;
        let id = tables.companies.insert(new_company.name);
        if let Some(user_ids) = &new_company.user_ids {
            tables.replace_users_of_company(id, user_ids);
        }
        Ok(tables.companies.rows[&id].to_company(id))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Company>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables.companies.live(id).map(|r| r.to_company(id)))
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Company>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .companies
            .page(offset, limit)
            .into_iter()
            .map(|(id, r)| r.to_company(id))
            .collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.tables.lock().await.companies.count())
    }

    async fn update(&self, id: i64, patch: CompanyPatch) -> Result<Option<Company>, AppError> {
        let mut tables = self.tables.lock().await;
        let Some(row) = tables.companies.live_mut(id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            row.name = name;
        }
        row.updated_at = Utc::now();
        let company = row.to_company(id);

        if let Some(user_ids) = &patch.user_ids {
            tables.replace_users_of_company(id, user_ids);
        }
        Ok(Some(company))
    }

    async fn soft_delete(&self, id: i64) -> Result<Option<Company>, AppError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.companies.soft_delete(id).map(|r| r.to_company(id)))
    }

    async fn restore(&self, id: i64) -> Result<Option<Company>, AppError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.companies.restore(id).map(|r| r.to_company(id)))
    }

    async fn sync_users(&self, id: i64, user_ids: &[i64]) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().await;
        if tables.companies.live(id).is_none() {
            return Ok(false);
        }
        tables.replace_users_of_company(id, user_ids);
        Ok(true)
    }

    async fn users_of(&self, company_ids: &[i64]) -> Result<Vec<(i64, EntityRef)>, AppError> {
        let tables = self.tables.lock().await;
        let mut pairs: Vec<(i64, EntityRef)> = tables
            .memberships
            .iter()
            .filter(|(_, c)| company_ids.contains(c))
            .filter_map(|(u, c)| {
                tables
                    .users
                    .live(*u)
                    .map(|r| (*c, r.to_user(*u).to_ref()))
            })
            .collect();
        pairs.sort_by_key(|(owner, related)| (*owner, related.id));
        Ok(pairs)
    }

    async fn existing_ids(&self, ids: &[i64]) -> Result<Vec<i64>, AppError> {
        Ok(self.tables.lock().await.companies.existing(ids))
    }
}
