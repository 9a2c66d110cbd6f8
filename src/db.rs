//! Connection pool setup and schema migrations.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::PoolConfig;

/// Opens a bounded Postgres pool and checks that it is reachable.
///
/// When every connection is busy, callers wait up to `acquire_timeout`
/// instead of failing straight away.
pub async fn connect(database_url: &str, pool: &PoolConfig) -> Result<PgPool, sqlx::Error> {
    let pg = PgPoolOptions::new()
        .max_connections(pool.max_connections)
        .min_connections(pool.min_connections)
        .max_lifetime(pool.max_lifetime)
        .idle_timeout(pool.idle_timeout)
        .acquire_timeout(pool.acquire_timeout)
        .connect(database_url)
        .await?;

    log::info!(
        "connected to Postgres (max {} connections)",
        pool.max_connections
    );
    Ok(pg)
}

/// Applies the migrations embedded from `migrations/`.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
