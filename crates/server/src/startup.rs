use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use configs::AppConfig;
use service::catalog::repo::seaorm::SeaOrmServiceRepository;

use crate::routes::{self, ServerState};

pub fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Router backed by Postgres through sea-orm.
pub fn app(db: DatabaseConnection) -> Router {
    let state = ServerState::new(Arc::new(SeaOrmServiceRepository::new(db)));
    routes::build_router(state, build_cors())
}

/// Connect (with retries) and bring the schema up to date when configured to.
pub async fn prepare_database(cfg: &AppConfig) -> anyhow::Result<DatabaseConnection> {
    let db_cfg = models::db::DatabaseConfig::from_settings(&cfg.database);
    let db = models::db::connect_with_config(&db_cfg).await?;
    if cfg.database.auto_migrate {
        Migrator::up(&db, None).await?;
        info!("database schema up to date");
    }
    Ok(db)
}

/// Public entry: build the app and run the HTTP server until ctrl-c.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = prepare_database(&cfg).await?;
    let app = app(db);

    let addr: SocketAddr = cfg.server.bind_addr().parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "service catalog listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("received Ctrl+C, draining connections");
    }
}
