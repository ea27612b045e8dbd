//! Database configuration module.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`. The only
//! table is the key/value store generated from the [`LocalStorage`] entity
//! definition, so the schema always matches the Rust struct.

use crate::entities::LocalStorage;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::info;

/// Default database location when neither `DATABASE_URL` nor `config.toml`
/// provides one. `mode=rwc` creates the file on first run.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/metaforma.sqlite?mode=rwc";

/// Resolves the database URL.
///
/// `DATABASE_URL` in the environment wins over the configured value.
#[must_use]
pub fn resolve_database_url(configured: Option<&str>) -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| configured.unwrap_or(DEFAULT_DATABASE_URL).to_string())
}

/// Parent directory of a file-backed `SQLite` URL, if it has one.
fn sqlite_parent_dir(database_url: &str) -> Option<&Path> {
    let rest = database_url.strip_prefix("sqlite://")?;
    let file = rest.split('?').next()?;
    Path::new(file)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
}

/// Establishes a connection to the `SQLite` database at `database_url`,
/// creating the database file's directory first if needed.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    if let Some(dir) = sqlite_parent_dir(database_url) {
        std::fs::create_dir_all(dir)?;
    }
    info!("Connecting to {database_url}");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates the key/value table if it does not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut local_storage_table = schema.create_table_from_entity(LocalStorage);
    local_storage_table.if_not_exists();

    db.execute(builder.build(&local_storage_table)).await?;

    Ok(())
}
