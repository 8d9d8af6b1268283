use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::{db_url, DbProfile};
use crate::error::AppError;

/// Connect to the database for the given profile. Does NOT run migrations.
pub async fn connect_db(profile: DbProfile) -> Result<DatabaseConnection, AppError> {
    let database_url = db_url(profile)?;

    let mut options = ConnectOptions::new(database_url);
    if profile == DbProfile::InMemory {
        // Each SQLite in-memory connection is its own database; everything
        // must go through the one connection the schema was created on.
        options.max_connections(1).min_connections(1);
    }

    let conn = Database::connect(options).await?;
    Ok(conn)
}

/// Single entrypoint for startup and tests: connect, then bring the schema
/// up to date.
pub async fn bootstrap_db(profile: DbProfile) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(profile).await?;

    info!(profile = ?profile, "Running pending migrations");
    migration::migrate(&conn, migration::MigrationCommand::Up).await?;

    Ok(conn)
}
