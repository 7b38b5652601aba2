mod accounts;
mod postgres;
mod sqlite;
mod traits;

pub use accounts::{Account, CreateAccount, Role};
pub use postgres::PostgresAccountStore;
pub use sqlite::SqliteAccountStore;
pub use traits::{AccountStore, StorageError, StorageResult};

use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::ServerConfig;

/// Open the account store described by the configuration.
///
/// Tries the primary PostgreSQL store first when POSTGRES_URL is set and
/// falls back to the local SQLite file when the primary is unreachable.
/// The chosen backend is logged so operators can tell which store a
/// process is actually running against.
pub async fn open_account_store(config: &ServerConfig) -> anyhow::Result<Arc<dyn AccountStore>> {
    if let Some(url) = &config.postgres_url {
        match PgPoolOptions::new().max_connections(10).connect(url).await {
            Ok(pool) => {
                let store = PostgresAccountStore::new(pool);
                store.initialize().await?;
                info!("Account store: PostgreSQL (primary)");
                return Ok(Arc::new(store));
            }
            Err(e) => {
                warn!(
                    "Primary PostgreSQL store unavailable ({}), falling back to SQLite",
                    e
                );
            }
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(&config.sqlite_path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    let store = SqliteAccountStore::new(pool);
    store.initialize().await?;
    info!("Account store: SQLite at {:?}", config.sqlite_path);
    Ok(Arc::new(store))
}
