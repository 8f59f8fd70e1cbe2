//! In-memory storage.
//!
//! [`MemoryStore`] implements every repository trait without a database. It is
//! what the HTTP integration tests run against.

mod memory_store;

pub use memory_store::MemoryStore;
