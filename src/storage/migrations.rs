// storage/migrations.rs
// Cache schema migration management

use sqlx::migrate::Migrator;
use sqlx::{Pool, Sqlite};

use crate::error_handling::StoreError;

/// Cache schema, compiled into the binary from `migrations/`.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Applies any cache schema migrations the database has not seen yet.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), StoreError> {
    MIGRATOR.run(pool).await?;
    Ok(())
}
