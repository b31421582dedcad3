use axum::{
    body::Bytes,
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::IntoParams;

use service::catalog::{
    domain::{CreateServiceInput, ServiceList, ServiceView},
    validation,
};
use service::errors::ServiceError;

use super::ServerState;
use crate::errors::ApiError;

/// Raw list parameters; validation happens in [`validation::list_params`].
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListServicesQuery {
    /// Exact service name.
    pub filter: Option<String>,
    /// `ASC` or `DESC` on name.
    pub sort: Option<String>,
    /// Page size, at most 100. Must be given together with `offset`.
    pub limit: Option<String>,
    /// Rows to skip. Must be given together with `limit`.
    pub offset: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct GetServiceQuery {
    /// `true` returns the versions array instead of `versionCount`.
    pub expand_versions: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedService {
    pub service: ServiceView,
}

#[utoipa::path(
    get,
    path = "/services",
    tag = "services",
    params(ListServicesQuery),
    responses(
        (status = 200, description = "One page of services", body = crate::openapi::ServiceListDoc),
        (status = 400, description = "Invalid filter, sort or pagination", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<ListServicesQuery>, QueryRejection>,
) -> Result<Json<ServiceList>, ApiError> {
    let Query(q) = query?;
    let params = validation::list_params(
        q.filter.as_deref(),
        q.sort.as_deref(),
        q.limit.as_deref(),
        q.offset.as_deref(),
    )?;
    let page = state.catalog.find_all(&params).await?;
    debug!(count = page.count, returned = page.services.len(), "services listed");
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/services/{id}",
    tag = "services",
    params(("id" = i32, Path, description = "Service id"), GetServiceQuery),
    responses(
        (status = 200, description = "Service", body = crate::openapi::ServiceDoc),
        (status = 400, description = "Invalid id or expandVersions", body = crate::openapi::ErrorDoc),
        (status = 404, description = "No such service", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<GetServiceQuery>, QueryRejection>,
) -> Result<Json<ServiceView>, ApiError> {
    let Path(raw_id) = path?;
    let Query(q) = query?;
    let id = validation::parse_id(&raw_id)?;
    let expand = validation::parse_flag("expandVersions", q.expand_versions.as_deref())?;
    let found = state.catalog.find_by_id(id, expand).await?.ok_or_else(|| ServiceError::not_found(id))?;
    Ok(Json(found))
}

#[utoipa::path(
    post,
    path = "/services",
    tag = "services",
    request_body = crate::openapi::CreateServiceDoc,
    responses(
        (status = 201, description = "Service created with its versions", body = crate::openapi::CreatedServiceDoc),
        (status = 400, description = "Malformed body or field too long", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedService>), ApiError> {
    let input = parse_create_body(&body)?;
    let service = state.catalog.create(input).await?;
    info!(service_id = service.id, "POST /services");
    Ok((StatusCode::CREATED, Json(CreatedService { service })))
}

/// An empty (or all-whitespace) body means "create with defaults".
fn parse_create_body(body: &[u8]) -> Result<CreateServiceInput, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CreateServiceInput::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::bad_request(format!("Invalid request body: {e}")))
}
