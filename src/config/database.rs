//! Database configuration module for local storage.
//!
//! This module handles the `SQLite` database connection and table creation
//! using `SeaORM`. The database backs the persistence bridge's key-value
//! storage; the schema is generated from the entity definitions with
//! `Schema::create_table_from_entity`, so no manual SQL is needed.

use crate::entities::StorageEntry;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Default `SQLite` location; `mode=rwc` creates the file on first run.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/storefront.sqlite?mode=rwc";

/// Establishes a connection to the storage database.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all necessary storage tables from the entity definitions.
///
/// Idempotent: tables are created with `IF NOT EXISTS`, so this is safe to
/// call on every startup.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut storage_table = schema.create_table_from_entity(StorageEntry);
    let storage_table = storage_table.if_not_exists();

    let _ = db.execute(builder.build(storage_table)).await?;

    Ok(())
}
