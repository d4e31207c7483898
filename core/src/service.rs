//! The four todo operations: list, create, update, delete.
//!
//! # Design
//! Each operation runs validate → act → respond and returns exactly one
//! `Reply`. Request bodies arrive as raw bytes so that decoding failures,
//! missing titles and malformed ids are all judged here, in a fixed order,
//! before the store is touched. Nothing in this module panics or returns an
//! error to its caller; store failures become `Reply::StorageError`.

use std::sync::Arc;

use tracing::{debug, error};

use crate::reply::Reply;
use crate::store::TodoStore;
use crate::types::{NewTodo, StoredTodo, TodoChanges, TodoId, WireTodo};

const INVALID_ID: &str = "The id is invalid";
const NOT_FOUND: &str = "todo not found";

/// Behaviour switches for `TodoService`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceOptions {
    /// Reply `NotFound` when an update matches no todo. Off by default, in
    /// which case an update of a missing id reports success.
    pub update_requires_existing: bool,
}

/// Todo operations over an injected store.
pub struct TodoService<S> {
    store: Arc<S>,
    options: ServiceOptions,
}

impl<S> Clone for TodoService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            options: self.options,
        }
    }
}

impl<S: TodoStore> TodoService<S> {
    pub fn new(store: S) -> Self {
        Self::with_options(store, ServiceOptions::default())
    }

    pub fn with_options(store: S, options: ServiceOptions) -> Self {
        Self {
            store: Arc::new(store),
            options,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All todos, oldest first.
    pub async fn list(&self) -> Reply {
        let mut todos = match self.store.list_all().await {
            Ok(todos) => todos,
            Err(e) => {
                error!(error = %e, "failed to fetch todos");
                return Reply::storage("error fetching todos", &e);
            }
        };
        todos.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Reply::Data {
            data: todos.into_iter().map(WireTodo::from).collect(),
        }
    }

    /// Create a todo from a JSON body carrying `title`.
    pub async fn create(&self, body: &[u8]) -> Reply {
        let input: NewTodo = match decode(body) {
            Ok(input) => input,
            Err(reply) => return reply,
        };
        let title = match input.title {
            Some(title) if !title.is_empty() => title,
            _ => {
                debug!("rejecting create without title");
                return Reply::validation("title is required");
            }
        };

        let todo = StoredTodo::new(title);
        let id = todo.id;
        if let Err(e) = self.store.insert(todo).await {
            error!(error = %e, "failed to create todo");
            return Reply::storage("error creating todo", &e);
        }

        debug!(%id, "created todo");
        Reply::Created {
            message: "todo created successfully".to_string(),
            todo_id: id.to_string(),
        }
    }

    /// Replace `title` and `completed` of the todo addressed by `raw_id`.
    pub async fn update(&self, raw_id: &str, body: &[u8]) -> Reply {
        let Some(id) = TodoId::parse(raw_id) else {
            debug!(raw_id, "rejecting update with invalid id");
            return Reply::validation(INVALID_ID);
        };
        let changes: TodoChanges = match decode(body) {
            Ok(changes) => changes,
            Err(reply) => return reply,
        };
        let title = match changes.title {
            Some(title) if !title.is_empty() => title,
            _ => {
                debug!(%id, "rejecting update without title");
                return Reply::validation("the title field is required");
            }
        };

        let completed = changes.completed.unwrap_or(false);
        match self.store.update(id, &title, completed).await {
            Ok(true) => Reply::message("todo updated successfully"),
            Ok(false) if self.options.update_requires_existing => Reply::not_found(NOT_FOUND),
            Ok(false) => {
                debug!(%id, "update matched no todo");
                Reply::message("todo updated successfully")
            }
            Err(e) => {
                error!(%id, error = %e, "failed to update todo");
                Reply::storage("failed to update todo", &e)
            }
        }
    }

    /// Remove the todo addressed by `raw_id`.
    pub async fn delete(&self, raw_id: &str) -> Reply {
        let Some(id) = TodoId::parse(raw_id) else {
            debug!(raw_id, "rejecting delete with invalid id");
            return Reply::validation(INVALID_ID);
        };

        match self.store.remove(id).await {
            Ok(true) => Reply::message("todo deleted successfully"),
            Ok(false) => Reply::not_found(NOT_FOUND),
            Err(e) => {
                error!(%id, error = %e, "failed to delete todo");
                Reply::storage("error deleting todo", &e)
            }
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, Reply> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "rejecting malformed body");
        Reply::validation(format!("invalid request body: {e}"))
    })
}
