//! User entity.

use chrono::{DateTime, Utc};

use super::EntityRef;

/// A person who can belong to any number of companies.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a new User instance.
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

    /// Returns true if the user has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Short `{id, name}` form used when the user appears inside a company.
    pub fn to_ref(&self) -> EntityRef {
        EntityRef::new(self.id, self.name.clone())
    }
}

/// Input data for creating a new user.
///
/// `company_ids: None` leaves memberships alone; `Some(vec![])` is an explicit
/// empty set and still triggers a sync.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub company_ids: Option<Vec<i64>>,
}

/// Partial update for an existing user.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub company_ids: Option<Vec<i64>>,
}

/// A user together with its companies, when they were loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDetails {
    pub user: User,
    pub companies: Option<Vec<EntityRef>>,
}

impl UserDetails {
    pub fn bare(user: User) -> Self {
        Self {
            user,
            companies: None,
        }
    }

    pub fn with_companies(user: User, companies: Vec<EntityRef>) -> Self {
        Self {
            user,
            companies: Some(companies),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(deleted_at: Option<DateTime<Utc>>) -> User {
        let now = Utc::now();
        User::new(1, "Ada".to_string(), now, now, deleted_at)
    }

    #[test]
    fn test_user_creation() {
        let user = user(None);

        assert_eq!(user.id, 1);
        assert_eq!(user.name, "Ada");
        assert!(!user.is_deleted());
    }

    #[test]
    fn test_user_is_deleted() {
        assert!(user(Some(Utc::now())).is_deleted());
    }

    #[test]
    fn test_user_to_ref() {
        let r = user(None).to_ref();
        assert_eq!(r.id, 1);
        assert_eq!(r.name, "Ada");
    }

    #[test]
    fn test_user_patch_default_changes_nothing() {
        let patch = UserPatch::default();
        assert!(patch.name.is_none());
        assert!(patch.company_ids.is_none());
    }

    #[test]
    fn test_details_constructors() {
        assert!(UserDetails::bare(user(None)).companies.is_none());
        assert_eq!(
            UserDetails::with_companies(user(None), vec![]).companies,
            Some(vec![])
        );
    }
}
