//! Core domain entities.
//!
//! Entities are plain data structures; persistence lives behind the traits in
//! [`crate::domain::repositories`].
//!
//! # Entity Types
//!
//! - [`User`] - A person
//! - [`Company`] - An organisation
//! - [`EntityRef`] - `{id, name}` summary of the other side of a membership
//!
//! Creation and update inputs are separate structs (`NewUser`, `UserPatch`,
//! `NewCompany`, `CompanyPatch`). The `*Details` structs pair an entity with its
//! related side when that side was loaded.

pub mod company;
pub mod user;

pub use company::{Company, CompanyDetails, CompanyPatch, NewCompany};
pub use user::{NewUser, User, UserDetails, UserPatch};

/// Summary of a related entity as embedded in the other side's resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    pub id: i64,
    pub name: String,
}

impl EntityRef {
    pub fn new(id: i64, name: String) -> Self {
        Self { id, name }
    }
}
