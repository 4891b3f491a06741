//! # Ovation Errors
//!
//! Error types shared across the Ovation workspace.
//!
//! Uses `thiserror` for structured error definitions with named fields so
//! call sites read as documentation.

use thiserror::Error;

/// Storage-layer errors surfaced by `MirrorStore` and `ClientDirectory`
/// implementations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Connection to {backend} failed: {reason}")]
    ConnectionError { backend: String, reason: String },

    #[error("Query on {backend} failed: {reason}")]
    QueryError { backend: String, reason: String },

    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    #[error("Not found on {backend}: {id}")]
    NotFound { backend: String, id: String },

    /// Unique-constraint violations; the safety net against two writers
    /// linking the same remote record twice.
    #[error("Constraint violated on {backend}: {detail}")]
    ConstraintViolation { backend: String, detail: String },
}
