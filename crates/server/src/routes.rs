use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::catalog::{repository::ServiceRepository, ServiceCatalog};

use crate::openapi::ApiDoc;

pub mod services;

/// Shared handler state.
#[derive(Clone)]
pub struct ServerState {
    pub catalog: Arc<ServiceCatalog<dyn ServiceRepository>>,
}

impl ServerState {
    pub fn new(repo: Arc<dyn ServiceRepository>) -> Self {
        Self { catalog: Arc::new(ServiceCatalog::new(repo)) }
    }
}

#[utoipa::path(
    get,
    path = "/healthcheck",
    tag = "health",
    responses((status = 200, description = "Process is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the application router: health, service catalog and the OpenAPI document.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let catalog = Router::new()
        .route("/services", get(services::list).post(services::create))
        .route("/services/:id", get(services::get))
        .with_state(state);

    Router::new()
        .route("/healthcheck", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(catalog)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
