//! Persistence layer: connection pool, migrations, models and repositories.

pub mod models;
pub mod repositories;

use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};

pub type DbPool = sqlx::PgPool;

/// Default pool size when `DATABASE_MAX_CONNECTIONS` is unset.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 20;

/// Errors raised while reading database settings from the environment.
#[derive(Debug, thiserror::Error)]
pub enum DbConfigError {
    #[error("{0} must be set when DATABASE_URL is not provided")]
    Missing(&'static str),

    #[error("invalid value for {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

/// Connection settings resolved from the environment.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub connect_options: PgConnectOptions,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Resolve connection settings.
    ///
    /// `DATABASE_URL` wins when present. Otherwise the connection is
    /// assembled from the split variables:
    ///
    /// | Env Var                    | Default   |
    /// |----------------------------|-----------|
    /// | `DATABASE_HOST`            | required  |
    /// | `DATABASE_PORT`            | `5432`    |
    /// | `DATABASE_USERNAME`        | required  |
    /// | `DATABASE_PASSWORD`        | empty     |
    /// | `DATABASE_NAME`            | required  |
    /// | `DATABASE_SSLMODE`         | `require` |
    /// | `DATABASE_MAX_CONNECTIONS` | `20`      |
    pub fn from_env() -> Result<Self, DbConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`DatabaseConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DbConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.trim().parse().map_err(|_| DbConfigError::Invalid {
                var: "DATABASE_MAX_CONNECTIONS",
                message: format!("expected a positive integer, got '{raw}'"),
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        if let Some(url) = get("DATABASE_URL") {
            let connect_options =
                PgConnectOptions::from_str(&url).map_err(|e| DbConfigError::Invalid {
                    var: "DATABASE_URL",
                    message: e.to_string(),
                })?;
            return Ok(Self {
                connect_options,
                max_connections,
            });
        }

        let host = get("DATABASE_HOST").ok_or(DbConfigError::Missing("DATABASE_HOST"))?;
        let username =
            get("DATABASE_USERNAME").ok_or(DbConfigError::Missing("DATABASE_USERNAME"))?;
        let database = get("DATABASE_NAME").ok_or(DbConfigError::Missing("DATABASE_NAME"))?;
        let port: u16 = match get("DATABASE_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| DbConfigError::Invalid {
                var: "DATABASE_PORT",
                message: format!("expected a port number, got '{raw}'"),
            })?,
            None => 5432,
        };
        let ssl_mode = match get("DATABASE_SSLMODE") {
            Some(raw) => PgSslMode::from_str(raw.trim()).map_err(|e| DbConfigError::Invalid {
                var: "DATABASE_SSLMODE",
                message: e.to_string(),
            })?,
            None => PgSslMode::Require,
        };

        let mut connect_options = PgConnectOptions::new()
            .host(&host)
            .port(port)
            .username(&username)
            .database(&database)
            .ssl_mode(ssl_mode);
        if let Some(password) = lookup("DATABASE_PASSWORD") {
            connect_options = connect_options.password(&password);
        }

        Ok(Self {
            connect_options,
            max_connections,
        })
    }
}

/// Create a connection pool from resolved settings.
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(config.connect_options.clone())
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
