use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

// 仅用于文档生成的 schema，字段名与实际 JSON 保持一致

#[derive(ToSchema)]
pub struct HealthResponse { pub app: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDoc {
    pub status_code: u16,
    pub error: String,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVersionDoc {
    pub label: String,
    pub status: String,
    pub description: Option<String>,
    pub environment: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceDoc {
    /// Blank or missing becomes `DefaultServiceName`.
    pub name: Option<String>,
    pub description: Option<String>,
    pub versions: Option<Vec<CreateVersionDoc>>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VersionDoc {
    pub id: i32,
    pub label: String,
    pub status: String,
    pub description: String,
    pub environment: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDoc {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
    /// Present unless `expandVersions=true`.
    pub version_count: Option<u64>,
    /// Present when `expandVersions=true` and on create.
    pub versions: Option<Vec<VersionDoc>>,
}

#[derive(ToSchema)]
pub struct CreatedServiceDoc { pub service: ServiceDoc }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummaryDoc {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
    pub version_count: u64,
}

#[derive(ToSchema)]
pub struct ServiceListDoc {
    pub services: Vec<ServiceSummaryDoc>,
    pub count: u64,
    pub limit: u64,
    pub offset: u64,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::services::list,
        crate::routes::services::get,
        crate::routes::services::create,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorDoc,
            CreateVersionDoc,
            CreateServiceDoc,
            VersionDoc,
            ServiceDoc,
            CreatedServiceDoc,
            ServiceSummaryDoc,
            ServiceListDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "services")
    )
)]
pub struct ApiDoc;
