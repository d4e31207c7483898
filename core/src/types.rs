//! Domain types for the todo collection.
//!
//! # Design
//! A todo exists in two shapes. `StoredTodo` is what the document store
//! persists: a native identifier and a real timestamp. `WireTodo` is what the
//! HTTP API speaks: the identifier as a string and the creation time
//! pre-formatted as `YYYY-MM-DD HH:MM:SS`. Conversion only goes one way
//! (stored to wire); inbound payloads never carry an id or a timestamp the
//! server would trust.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Format used for `createdAt` on the wire.
pub const WIRE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Unique identifier of a stored todo, minted by the store on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(Uuid);

impl TodoId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a path segment into an id. Surrounding whitespace is ignored;
    /// anything that is not a UUID is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::try_parse(raw.trim()).ok().map(Self)
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

/// A todo as persisted in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTodo {
    #[serde(rename = "_id")]
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl StoredTodo {
    /// A fresh, incomplete todo with a server-minted id and timestamp.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: TodoId::new(),
            title: title.into(),
            completed: false,
            created_at: Utc::now(),
        }
    }
}

/// A todo as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTodo {
    pub id: String,
    pub title: String,
    pub completed: bool,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl From<StoredTodo> for WireTodo {
    fn from(t: StoredTodo) -> Self {
        Self {
            id: t.id.to_string(),
            title: t.title,
            completed: t.completed,
            created_at: t.created_at.format(WIRE_TIME_FORMAT).to_string(),
        }
    }
}

/// Request payload for creating a todo. Only `title` is read; clients may
/// send a full wire record and the remaining fields are dropped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTodo {
    #[serde(default)]
    pub title: Option<String>,
}

/// Request payload for replacing the mutable fields of a todo. A missing or
/// `null` `completed` means `false`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoChanges {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn parse_accepts_hyphenated_uuid_with_padding() {
        let id = TodoId::new();
        let padded = format!("  {id} ");
        assert_eq!(TodoId::parse(&padded), Some(id));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(TodoId::parse("").is_none());
        assert!(TodoId::parse("not-an-id").is_none());
        assert!(TodoId::parse("5f1b2c3d4e5f6a7b8c9d0e1f").is_none());
    }

    #[test]
    fn fresh_ids_are_distinct() {
        assert_ne!(TodoId::new(), TodoId::new());
    }

    #[test]
    fn stored_todo_starts_incomplete() {
        let todo = StoredTodo::new("buy milk");
        assert_eq!(todo.title, "buy milk");
        assert!(!todo.completed);
    }

    #[test]
    fn wire_todo_formats_timestamp() {
        let stored = StoredTodo {
            id: TodoId::parse("00000000-0000-0000-0000-000000000001").unwrap(),
            title: "Test".to_string(),
            completed: true,
            created_at: Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap(),
        };
        let wire = WireTodo::from(stored);
        assert_eq!(wire.id, "00000000-0000-0000-0000-000000000001");
        assert_eq!(wire.created_at, "2024-03-09 07:05:01");

        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["createdAt"], "2024-03-09 07:05:01");
        assert_eq!(json["completed"], true);
    }

    #[test]
    fn stored_todo_document_uses_store_field_names() {
        let stored = StoredTodo::new("doc");
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["_id"], stored.id.to_string());
        assert!(json.get("createdAt").is_some());
        let back: StoredTodo = serde_json::from_value(json).unwrap();
        assert_eq!(back, stored);
    }

    #[test]
    fn new_todo_ignores_client_supplied_fields() {
        let input: NewTodo = serde_json::from_str(
            r#"{"id":"x","title":"Walk dog","completed":true,"createdAt":"2020-01-01 00:00:00"}"#,
        )
        .unwrap();
        assert_eq!(input.title.as_deref(), Some("Walk dog"));
    }

    #[test]
    fn new_todo_title_is_optional_on_the_wire() {
        let input: NewTodo = serde_json::from_str("{}").unwrap();
        assert!(input.title.is_none());
    }

    #[test]
    fn todo_changes_completed_is_optional() {
        let input: TodoChanges = serde_json::from_str(r#"{"title":"New title"}"#).unwrap();
        assert_eq!(input.title.as_deref(), Some("New title"));
        assert!(input.completed.is_none());
    }

    #[test]
    fn todo_changes_accepts_null_completed() {
        let input: TodoChanges =
            serde_json::from_str(r#"{"title":"b","completed":null}"#).unwrap();
        assert!(input.completed.is_none());
    }
}
