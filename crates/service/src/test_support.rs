#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::{config_from_env, connect_with_config};

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Connection to a migrated test database.
///
/// Without `DATABASE_URL` every call gets its own in-memory SQLite database.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let mut cfg = config_from_env();
    if cfg.is_sqlite() && cfg.url.contains(":memory:") {
        let db = connect_with_config(&cfg).await?;
        migration::Migrator::up(&db, None).await?;
        return Ok(db);
    }

    // Run migrations exactly once, with a throwaway connection
    MIGRATED
        .get_or_init(|| async {
            let cfg = config_from_env();
            let db = connect_with_config(&cfg).await.expect("connect db for migration");
            migration::Migrator::up(&db, None).await.expect("migrate up");
            drop(db);
        })
        .await;

    // Return a fresh connection for the current test's runtime
    cfg.max_connections = cfg.max_connections.max(10);
    cfg.min_connections = cfg.min_connections.min(1);
    cfg.acquire_timeout_secs = 10;
    let db = connect_with_config(&cfg).await?;
    Ok(db)
}

/// Short random suffix for unique names.
pub fn suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..10].to_string()
}
