//! Domain layer: entities and repository contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Users, companies and the `{id, name}` references between them
//! - [`repositories`] - Data access trait definitions
//!
//! The domain layer has no dependency on HTTP or SQL. Orchestration lives in
//! [`crate::application::services`].

pub mod entities;
pub mod repositories;
