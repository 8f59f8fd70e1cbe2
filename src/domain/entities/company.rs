//! Company entity.

use chrono::{DateTime, Utc};

use super::EntityRef;

/// An organisation with any number of member users.
#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Company {
    /// Creates a new Company instance.
    pub fn new(
        id: i64,
        name: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            name,
            created_at,
            updated_at,
            deleted_at,
        }
    }

    /// Returns true if the company has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn to_ref(&self) -> EntityRef {
        EntityRef::new(self.id, self.name.clone())
    }
}

/// Input data for creating a new company.
///
/// See [`super::NewUser`] for the meaning of `None` versus an empty list.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCompany {
    pub name: String,
    pub user_ids: Option<Vec<i64>>,
}

/// Partial update for an existing company.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub user_ids: Option<Vec<i64>>,
}

/// A company together with its users, when they were loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyDetails {
    pub company: Company,
    pub users: Option<Vec<EntityRef>>,
}

impl CompanyDetails {
    pub fn bare(company: Company) -> Self {
        Self {
            company,
            users: None,
        }
    }

    pub fn with_users(company: Company, users: Vec<EntityRef>) -> Self {
        Self {
            company,
            users: Some(users),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_creation() {
        let now = Utc::now();
        let company = Company::new(4, "Acme".to_string(), now, now, None);

        assert_eq!(company.id, 4);
        assert_eq!(company.name, "Acme");
        assert!(!company.is_deleted());
        assert_eq!(company.to_ref(), EntityRef::new(4, "Acme".to_string()));
    }

    #[test]
    fn test_company_is_deleted() {
        let now = Utc::now();
        let company = Company::new(4, "Acme".to_string(), now, now, Some(now));
        assert!(company.is_deleted());
    }
}
