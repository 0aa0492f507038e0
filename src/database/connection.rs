use sqlx::{
    PgPool,
    migrate::{MigrateError, Migrator},
    postgres::PgPoolOptions,
};

use crate::{
    config::DatabaseConfig,
    error::{AppError, Result},
};

/// Schema for product types, special tags and products.
static CATALOG_MIGRATIONS: Migrator = sqlx::migrate!();

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;

    CATALOG_MIGRATIONS
        .run(&pool)
        .await
        .map_err(migration_failed)?;

    tracing::info!(
        "Catalog schema up to date ({} migrations), pool allows {} connections",
        CATALOG_MIGRATIONS.iter().count(),
        config.max_connections
    );

    Ok(pool)
}

pub async fn check_health(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

fn migration_failed(err: MigrateError) -> AppError {
    AppError::InternalError(format!(
        "Failed to migrate the catalog schema (product types, special tags, products): {}",
        err
    ))
}
