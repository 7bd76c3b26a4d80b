//! CLI command implementations.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;

use smart_bazaar_server::BazaarConfig;
use smart_bazaar_server::store::postgres;

/// Errors shared by commands that need the database.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("configuration error: {0}")]
    Config(#[from] smart_bazaar_server::config::ConfigError),

    #[error("BAZAAR_DATABASE_URL (or DATABASE_URL) is not set")]
    NoDatabase,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Load configuration and connect to the configured database.
pub async fn connect() -> Result<PgPool, CommandError> {
    let config = BazaarConfig::from_env()?;
    let database_url: SecretString = config.database_url.ok_or(CommandError::NoDatabase)?;

    tracing::info!("Connecting to database...");
    Ok(postgres::create_pool(&database_url).await?)
}
