//! Runtime configuration, from command-line flags or environment variables.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, ValueEnum};
use todo_core::ServiceOptions;

use crate::error::ServerError;
use crate::Timeouts;

/// Which backend holds the todo collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// SQLite file holding one table of JSON documents per collection.
    Sqlite,
    /// Process memory; everything is lost on exit.
    Memory,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "todo-server")]
#[command(version, about = "HTTP service for a todo list", long_about = None)]
pub struct Config {
    /// Host address to bind to
    #[arg(long, env = "TODO_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "TODO_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Storage backend
    #[arg(long, env = "TODO_STORE", value_enum, default_value_t = StoreKind::Sqlite)]
    pub store: StoreKind,

    /// Database file for the sqlite backend
    #[arg(long, env = "TODO_DATABASE", default_value = "demo_todo.db")]
    pub database: PathBuf,

    /// Collection (table) holding the todos
    #[arg(long, env = "TODO_COLLECTION", default_value = "todo")]
    pub collection: String,

    /// Seconds in-flight requests may run after a shutdown signal
    #[arg(long, env = "TODO_SHUTDOWN_GRACE_SECS", default_value_t = 5)]
    pub shutdown_grace_secs: u64,

    /// Seconds a single request may take before it is answered with 408
    #[arg(long, env = "TODO_REQUEST_TIMEOUT_SECS", default_value_t = 60)]
    pub request_timeout_secs: u64,

    /// Reply 404 when an update addresses a todo that does not exist
    #[arg(
        long,
        env = "TODO_UPDATE_REQUIRES_EXISTING",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        default_value = "false"
    )]
    pub update_requires_existing: bool,
}

impl Config {
    pub fn validate(&self) -> Result<(), ServerError> {
        if !is_identifier(&self.collection) {
            return Err(ServerError::Config {
                message: format!(
                    "collection name '{}' must match [A-Za-z_][A-Za-z0-9_]*",
                    self.collection
                ),
            });
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            request: Duration::from_secs(self.request_timeout_secs),
            shutdown_grace: Duration::from_secs(self.shutdown_grace_secs),
        }
    }

    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            update_requires_existing: self.update_requires_existing,
        }
    }
}

/// Whether `name` can be spliced into SQL as a table name.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
