//! # Ovation Core
//!
//! Shared types and traits for the Ovation mirror of Hostware-owned records.
//!
//! This crate provides:
//! - The mirror entity model (typed field maps, correlation metadata)
//! - Core traits implemented by the storage layer (`MirrorStore`,
//!   `ClientDirectory`)
//! - Identifier newtypes with validation

pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use traits::{ClientDirectory, MirrorStore};
pub use types::{
    ClientId, EntityKind, FieldMap, FieldValue, Metadata, MirrorEntity, NewMirrorEntity,
    RemoteScope,
};
