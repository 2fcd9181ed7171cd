use std::{env, time::Duration};

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

pub use configs::DatabaseConfig;

/// Database settings taken from `DATABASE_URL`, or an in-memory SQLite database when unset.
pub fn config_from_env() -> DatabaseConfig {
    let _ = dotenvy::dotenv();
    let url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
    DatabaseConfig { url, ..DatabaseConfig::default() }
}

/// Pool options sized and timed from `cfg`.
///
/// An in-memory SQLite database lives inside a single connection, so the pool is pinned to one
/// that is never retired.
pub fn connect_options(cfg: &DatabaseConfig) -> ConnectOptions {
    let mut opt = ConnectOptions::new(cfg.url.clone());
    if is_in_memory(cfg) {
        opt.max_connections(1)
            .min_connections(1)
            .idle_timeout(KEEP_FOREVER)
            .max_lifetime(KEEP_FOREVER);
    } else {
        opt.max_connections(cfg.max_connections)
            .min_connections(cfg.min_connections)
            .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs));
    }
    opt.connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .sqlx_logging(cfg.sqlx_logging);
    opt
}

/// Retirement age for the pinned in-memory connection (about a century).
const KEEP_FOREVER: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

fn is_in_memory(cfg: &DatabaseConfig) -> bool {
    cfg.is_sqlite() && cfg.url.contains(":memory:")
}

pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let db = Database::connect(connect_options(cfg)).await?;
    info!(backend = ?db.get_database_backend(), in_memory = is_in_memory(cfg), "database connected");
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_pool_is_pinned_and_never_recycled() {
        let cfg = DatabaseConfig { url: "sqlite::memory:".into(), ..DatabaseConfig::default() };
        let opt = connect_options(&cfg);
        assert_eq!((opt.get_max_connections(), opt.get_min_connections()), (Some(1), Some(1)));
        assert_eq!(opt.get_max_lifetime(), Some(KEEP_FOREVER));
        assert_eq!(opt.get_idle_timeout(), Some(KEEP_FOREVER));
    }

    #[test]
    fn server_pool_follows_config() {
        let cfg = DatabaseConfig { url: "postgres://u:p@localhost/db".into(), ..DatabaseConfig::default() };
        let opt = connect_options(&cfg);
        assert_eq!(opt.get_max_connections(), Some(cfg.max_connections));
        assert_eq!(opt.get_max_lifetime(), Some(Duration::from_secs(cfg.max_lifetime_secs)));
    }
}
