//! Errors that stop the server from starting or running.
//!
//! Anything that goes wrong while handling a single request is a `Reply`
//! and never surfaces here.

use thiserror::Error;
use todo_core::StoreError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("invalid configuration: {message}")]
    Config { message: String },

    #[error("failed to open storage: {0}")]
    Storage(#[from] StoreError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
