//! Core of the todo service.
//!
//! # Overview
//! Holds everything about a todo that does not depend on HTTP: the stored and
//! wire representations, the identifier, the storage seam and the service
//! implementing list, create, update and delete.
//!
//! # Design
//! - `TodoService` owns an injected `TodoStore` behind an `Arc`; it is cheap
//!   to clone and is handed to the router at startup.
//! - Every operation returns a `Reply`, a closed set of payload variants
//!   that carries its own status code.
//! - Types use owned `String` fields so replies serialize without borrowing
//!   from the store.

pub mod error;
pub mod reply;
pub mod service;
pub mod store;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use reply::Reply;
pub use service::{ServiceOptions, TodoService};
pub use store::{MemoryStore, TodoStore};
pub use types::{NewTodo, StoredTodo, TodoChanges, TodoId, WireTodo, WIRE_TIME_FORMAT};
