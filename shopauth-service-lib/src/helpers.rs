use secrecy::ExposeSecret;
use shopauth_adapters::{PostgresAccountStore, Settings};
use shopauth_core::{AccountStores, Role};
use sqlx::{postgres::PgPoolOptions, PgPool};

/// Configure and return a PostgreSQL connection pool from settings.
pub async fn configure_postgresql(settings: &Settings) -> Result<PgPool, sqlx::Error> {
    get_postgres_pool(settings.postgres.url.expose_secret()).await
}

/// Create a PostgreSQL connection pool
///
/// # Arguments
/// * `url` - Database connection URL
pub async fn get_postgres_pool(url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new().max_connections(5).connect(url).await
}

/// Build the per-role store pair over one pool. Both roles share the
/// `accounts` table; the role column keeps their key spaces separate.
pub fn account_stores(pool: PgPool) -> AccountStores<PostgresAccountStore> {
    AccountStores::new(
        PostgresAccountStore::new(pool.clone(), Role::User),
        PostgresAccountStore::new(pool, Role::Admin),
    )
}
