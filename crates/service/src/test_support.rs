#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

fn test_config() -> DatabaseConfig {
    let mut cfg = DatabaseConfig::from_env();
    cfg.max_connections = cfg.max_connections.max(10);
    cfg.min_connections = cfg.min_connections.min(1);
    cfg.acquire_timeout = std::time::Duration::from_secs(10);
    cfg.connect_retries = 0;
    cfg
}

/// Database-backed tests run only when `DATABASE_URL` is set and `SKIP_DB_TESTS` is not.
pub fn db_tests_enabled() -> bool {
    std::env::var("SKIP_DB_TESTS").is_err() && std::env::var("DATABASE_URL").is_ok()
}

/// A migrated connection, or `None` when database tests are disabled.
pub async fn get_db() -> Result<Option<DatabaseConnection>, anyhow::Error> {
    if !db_tests_enabled() {
        return Ok(None);
    }
    // Run migrations exactly once, with a throwaway connection
    let migrated = *MIGRATED
        .get_or_init(|| async {
            let Ok(db) = connect_with_config(&test_config()).await else { return false };
            let ok = migration::Migrator::up(&db, None).await.is_ok();
            drop(db);
            ok
        })
        .await;
    if !migrated {
        return Err(anyhow::anyhow!("test database unavailable or migration failed"));
    }

    // Return a fresh connection for the current test's runtime
    Ok(Some(connect_with_config(&test_config()).await?))
}
