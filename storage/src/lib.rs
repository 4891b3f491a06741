//! # Storage Layer
//!
//! `MirrorStore` and `ClientDirectory` implementations: PostgreSQL for
//! deployments, in-memory doubles for tests and local development.

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryClientDirectory, InMemoryMirrorStore};
pub use postgres::PostgresMirrorStore;
