//! Response payloads produced by the todo service.
//!
//! # Design
//! Every operation ends in exactly one `Reply`. The set of variants is closed
//! so the HTTP layer can map each to a status code exhaustively, and the
//! serialized body shapes stay fixed: `{data}`, `{message, todo_id}`,
//! `{message}` or `{message, error}`. Status codes are plain `u16` values so
//! this crate stays independent of any HTTP framework.

use serde::Serialize;

use crate::error::StoreError;
use crate::types::WireTodo;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    /// A list of todos wrapped under `data`.
    Data { data: Vec<WireTodo> },

    /// A todo was created.
    Created { message: String, todo_id: String },

    /// The operation succeeded and has nothing to return but a message.
    Message { message: String },

    /// The request was rejected before any write.
    Validation { message: String },

    /// The addressed todo does not exist.
    NotFound { message: String },

    /// The store failed to carry out the operation.
    StorageError { message: String, error: String },
}

impl Reply {
    pub fn message(message: impl Into<String>) -> Self {
        Reply::Message {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Reply::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Reply::NotFound {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>, error: &StoreError) -> Self {
        Reply::StorageError {
            message: message.into(),
            error: error.to_string(),
        }
    }

    /// HTTP status code for this reply.
    pub fn status(&self) -> u16 {
        match self {
            Reply::Data { .. } | Reply::Created { .. } | Reply::Message { .. } => 200,
            Reply::Validation { .. } => 400,
            Reply::NotFound { .. } => 404,
            Reply::StorageError { .. } => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_serializes_under_data_key() {
        let reply = Reply::Data { data: Vec::new() };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json, serde_json::json!({ "data": [] }));
        assert_eq!(reply.status(), 200);
    }

    #[test]
    fn created_carries_todo_id() {
        let reply = Reply::Created {
            message: "todo created successfully".to_string(),
            todo_id: "abc".to_string(),
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["todo_id"], "abc");
        assert_eq!(json["message"], "todo created successfully");
    }

    #[test]
    fn validation_is_a_client_error_with_message_only() {
        let reply = Reply::validation("title is required");
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "title is required" }));
        assert_eq!(reply.status(), 400);
    }

    #[test]
    fn storage_error_includes_cause() {
        let err = StoreError::Backend {
            message: "disk full".to_string(),
        };
        let reply = Reply::storage("error creating todo", &err);
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["message"], "error creating todo");
        assert_eq!(json["error"], "storage error: disk full");
        assert_eq!(reply.status(), 500);
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(Reply::not_found("todo not found").status(), 404);
    }
}
