//! Storage abstraction for the todo collection.
//!
//! `TodoStore` is the seam between the service and whatever document store
//! backs it. One store value is created at startup and shared by every
//! request, so implementations must be safe for concurrent use.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::types::{StoredTodo, TodoId};

/// A collection of todo documents.
pub trait TodoStore: Send + Sync + 'static {
    /// Every stored todo, in whatever order the backend scans them.
    fn list_all(&self) -> impl Future<Output = StoreResult<Vec<StoredTodo>>> + Send;

    /// Persist a new todo.
    fn insert(&self, todo: StoredTodo) -> impl Future<Output = StoreResult<()>> + Send;

    /// Overwrite `title` and `completed` of the todo with `id`.
    ///
    /// Returns whether a todo matched. `id` and `created_at` are never touched.
    fn update(
        &self,
        id: TodoId,
        title: &str,
        completed: bool,
    ) -> impl Future<Output = StoreResult<bool>> + Send;

    /// Remove the todo with `id`, returning whether one existed.
    fn remove(&self, id: TodoId) -> impl Future<Output = StoreResult<bool>> + Send;

    /// Release the underlying connection. Later calls may fail.
    fn close(&self) -> impl Future<Output = ()> + Send;
}

/// In-process store backed by a `HashMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    todos: Arc<RwLock<HashMap<TodoId, StoredTodo>>>,
    closed: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Unavailable {
                message: "memory store is closed".to_string(),
            });
        }
        Ok(())
    }
}

impl TodoStore for MemoryStore {
    async fn list_all(&self) -> StoreResult<Vec<StoredTodo>> {
        self.ensure_open()?;
        let todos = self.todos.read().await;
        Ok(todos.values().cloned().collect())
    }

    async fn insert(&self, todo: StoredTodo) -> StoreResult<()> {
        self.ensure_open()?;
        let mut todos = self.todos.write().await;
        if todos.contains_key(&todo.id) {
            return Err(StoreError::Backend {
                message: format!("duplicate id '{}'", todo.id),
            });
        }
        todos.insert(todo.id, todo);
        Ok(())
    }

    async fn update(&self, id: TodoId, title: &str, completed: bool) -> StoreResult<bool> {
        self.ensure_open()?;
        let mut todos = self.todos.write().await;
        let Some(todo) = todos.get_mut(&id) else {
            return Ok(false);
        };
        todo.title = title.to_string();
        todo.completed = completed;
        Ok(true)
    }

    async fn remove(&self, id: TodoId) -> StoreResult<bool> {
        self.ensure_open()?;
        Ok(self.todos.write().await.remove(&id).is_some())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_then_list() {
        let store = MemoryStore::new();
        let todo = StoredTodo::new("Test");
        store.insert(todo.clone()).await.unwrap();

        let todos = store.list_all().await.unwrap();
        assert_eq!(todos, vec![todo]);
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let store = MemoryStore::new();
        let todo = StoredTodo::new("Test");
        store.insert(todo.clone()).await.unwrap();

        let err = store.insert(todo).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend { .. }));
    }

    #[tokio::test]
    async fn update_touches_only_title_and_completed() {
        let store = MemoryStore::new();
        let todo = StoredTodo::new("Before");
        store.insert(todo.clone()).await.unwrap();

        assert!(store.update(todo.id, "After", true).await.unwrap());

        let stored = store.list_all().await.unwrap().remove(0);
        assert_eq!(stored.id, todo.id);
        assert_eq!(stored.created_at, todo.created_at);
        assert_eq!(stored.title, "After");
        assert!(stored.completed);
    }

    #[tokio::test]
    async fn update_and_remove_report_missing_ids() {
        let store = MemoryStore::new();
        let id = TodoId::new();
        assert!(!store.update(id, "Nope", false).await.unwrap());
        assert!(!store.remove(id).await.unwrap());
    }

    #[tokio::test]
    async fn closed_store_refuses_work() {
        let store = MemoryStore::new();
        store.close().await;

        let err = store.list_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable { .. }));
    }
}
