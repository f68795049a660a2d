//! Error vocabulary shared by the storage ports.
//!
//! The domain crates define their store traits (`CustomerStore`, `MovieStore`,
//! `RentalStore`) against this one error type so processors can be written
//! once and run over any backend.

use thiserror::Error;

/// Result type returned by every store operation.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a storage port.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The targeted record does not exist.
    #[error("record not found")]
    NotFound,

    /// A conditional write lost its race (e.g. the guarded column changed
    /// between read and write). Exactly one of a set of concurrent
    /// conditional writes can succeed.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backend itself failed (connection, query, serialization).
    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
