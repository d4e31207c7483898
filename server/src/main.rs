use clap::Parser;
use todo_core::MemoryStore;
use todo_server::{Config, ServerError, SqliteStore, StoreKind};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    todo_server::init_tracing();

    let config = Config::parse();
    config.validate()?;

    match config.store {
        StoreKind::Memory => todo_server::run(&config, MemoryStore::new()).await,
        StoreKind::Sqlite => {
            let store = SqliteStore::open(&config.database, &config.collection).await?;
            todo_server::run(&config, store).await
        }
    }
}
