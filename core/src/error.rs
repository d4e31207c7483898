//! Error types for the todo store.
//!
//! # Design
//! Storage backends translate their native failures into `StoreError` so the
//! service layer can report them without knowing which backend is in use.
//! Validation problems are not errors at this level; the service turns them
//! into replies before the store is ever touched.

use thiserror::Error;

/// Failures reported by a `TodoStore` implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend cannot be reached, or has already been closed.
    #[error("storage unavailable: {message}")]
    Unavailable { message: String },

    /// A read or write was rejected by the backend.
    #[error("storage error: {message}")]
    Backend { message: String },

    /// A persisted document could not be decoded into a `StoredTodo`.
    #[error("malformed document '{id}': {message}")]
    Malformed { id: String, message: String },
}

pub type StoreResult<T> = Result<T, StoreError>;
