//! SQLite-backed document store.
//!
//! A collection is a table of JSON documents keyed by id:
//! `(id TEXT PRIMARY KEY, doc TEXT)`. Documents are `StoredTodo` values
//! serialized as `{_id, title, completed, createdAt}`. Updates patch the
//! document in place with `json_set`, so fields other than `title` and
//! `completed` are never rewritten.

use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use todo_core::{StoreError, StoreResult, StoredTodo, TodoId, TodoStore};
use tracing::info;

use crate::config::is_identifier;

pub struct SqliteStore {
    pool: SqlitePool,
    collection: String,
}

impl SqliteStore {
    /// Open (or create) the database file at `path`.
    pub async fn open(path: &Path, collection: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(unavailable)?;
        info!(path = %path.display(), collection, "opened sqlite store");
        Self::with_pool(pool, collection).await
    }

    /// A private in-memory database, mostly for tests.
    pub async fn in_memory(collection: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(unavailable)?;
        // Every connection to :memory: is its own database, so keep exactly one alive.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(unavailable)?;
        Self::with_pool(pool, collection).await
    }

    async fn with_pool(pool: SqlitePool, collection: &str) -> StoreResult<Self> {
        if !is_identifier(collection) {
            return Err(StoreError::Backend {
                message: format!("invalid collection name '{collection}'"),
            });
        }
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS \"{collection}\" (id TEXT PRIMARY KEY NOT NULL, doc TEXT NOT NULL)"
        );
        sqlx::query(&sql)
            .execute(&pool)
            .await
            .map_err(backend)?;
        Ok(Self {
            pool,
            collection: collection.to_string(),
        })
    }
}

impl TodoStore for SqliteStore {
    async fn list_all(&self) -> StoreResult<Vec<StoredTodo>> {
        let sql = format!("SELECT id, doc FROM \"{}\"", self.collection);
        let rows: Vec<(String, String)> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;

        rows.into_iter()
            .map(|(id, doc)| {
                serde_json::from_str(&doc).map_err(|e| StoreError::Malformed {
                    id,
                    message: e.to_string(),
                })
            })
            .collect()
    }

    async fn insert(&self, todo: StoredTodo) -> StoreResult<()> {
        let doc = serde_json::to_string(&todo).map_err(|e| StoreError::Backend {
            message: format!("failed to serialize todo: {e}"),
        })?;
        let sql = format!("INSERT INTO \"{}\" (id, doc) VALUES (?, ?)", self.collection);
        sqlx::query(&sql)
            .bind(todo.id.to_string())
            .bind(doc)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn update(&self, id: TodoId, title: &str, completed: bool) -> StoreResult<bool> {
        let sql = format!(
            "UPDATE \"{}\" SET doc = json_set(doc, '$.title', ?, '$.completed', json(?)) WHERE id = ?",
            self.collection
        );
        let result = sqlx::query(&sql)
            .bind(title)
            .bind(if completed { "true" } else { "false" })
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove(&self, id: TodoId) -> StoreResult<bool> {
        let sql = format!("DELETE FROM \"{}\" WHERE id = ?", self.collection);
        let result = sqlx::query(&sql)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        Ok(result.rows_affected() > 0)
    }

    async fn close(&self) {
        self.pool.close().await;
        info!(collection = %self.collection, "closed sqlite store");
    }
}

fn unavailable(e: sqlx::Error) -> StoreError {
    StoreError::Unavailable {
        message: e.to_string(),
    }
}

fn backend(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => unavailable(e),
        other => StoreError::Backend {
            message: other.to_string(),
        },
    }
}
