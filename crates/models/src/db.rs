use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use once_cell::sync::Lazy;
use std::time::Duration;
use tracing::{info, warn};

pub static DATABASE_URL: Lazy<String> = Lazy::new(|| {
    // Load .env if present
    let _ = dotenvy::dotenv();
    configs::database_url_from_env()
});

/// Pool and connection settings in the shape sea-orm expects.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    pub acquire_timeout: Duration,
    pub sqlx_logging: bool,
    pub connect_retries: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::from_settings(&configs::DatabaseConfig::default())
    }
}

impl DatabaseConfig {
    pub fn from_settings(s: &configs::DatabaseConfig) -> Self {
        Self {
            url: s.url.clone(),
            max_connections: s.max_connections,
            min_connections: s.min_connections,
            connect_timeout: Duration::from_secs(s.connect_timeout_secs),
            idle_timeout: Duration::from_secs(s.idle_timeout_secs),
            max_lifetime: Duration::from_secs(s.max_lifetime_secs),
            acquire_timeout: Duration::from_secs(s.acquire_timeout_secs),
            sqlx_logging: s.sqlx_logging,
            connect_retries: s.connect_retries,
        }
    }

    /// Defaults with the URL taken from the environment.
    pub fn from_env() -> Self {
        Self { url: DATABASE_URL.clone(), ..Self::default() }
    }

    fn connect_options(&self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(self.url.clone());
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(self.connect_timeout)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
            .sqlx_logging(self.sqlx_logging);
        opt
    }
}

/// Connect, retrying with a linear backoff up to `connect_retries` extra attempts.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut attempt = 0u32;
    loop {
        match Database::connect(cfg.connect_options()).await {
            Ok(db) => {
                info!(attempt, max_connections = cfg.max_connections, "database connected");
                return Ok(db);
            }
            Err(e) if attempt < cfg.connect_retries => {
                attempt += 1;
                warn!(attempt, error = %e, "database connect failed; retrying");
                tokio::time::sleep(Duration::from_millis(200 * u64::from(attempt))).await;
            }
            Err(e) => return Err(anyhow::anyhow!("cannot connect to database after {} attempts: {e}", attempt + 1)),
        }
    }
}
