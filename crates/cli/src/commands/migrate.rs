//! Database migration command.
//!
//! Creates the `bazaar.documents` table behind the document store and the
//! `tower_sessions` table behind login sessions. Both steps are idempotent.

use tower_sessions_sqlx_store::PostgresStore;

use smart_bazaar_server::store::postgres;

use super::{CommandError, connect};

/// Run all migrations.
///
/// # Errors
///
/// Returns an error if the database is not configured or a statement fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Creating document tables...");
    postgres::ensure_schema(&pool).await?;

    tracing::info!("Creating session tables...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
