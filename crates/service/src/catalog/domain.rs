use std::str::FromStr;

use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Direction of the `name` ordering on list queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = ();

    /// Case-sensitive: only `ASC` and `DESC` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            _ => Err(()),
        }
    }
}

/// Validated parameters of a list request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListParams {
    /// Exact service name to match.
    pub filter: Option<String>,
    pub sort: Option<SortOrder>,
    pub pagination: Pagination,
}

/// Query handed to the repository for one page of services.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceQuery {
    pub name: Option<String>,
    pub sort: Option<SortOrder>,
    pub limit: u64,
    pub offset: u64,
}

impl From<&ListParams> for ServiceQuery {
    fn from(p: &ListParams) -> Self {
        Self {
            name: p.filter.clone(),
            sort: p.sort,
            limit: p.pagination.limit,
            offset: p.pagination.offset,
        }
    }
}

/// Body of `POST /services`. Every field is optional.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub versions: Option<Vec<CreateVersionInput>>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateVersionInput {
    pub label: String,
    pub status: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub environment: Option<String>,
}

/// One row of the list response: versions collapsed to a count.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub version_count: u64,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ServiceList {
    pub services: Vec<ServiceSummary>,
    /// Rows matching the filter, ignoring the page window.
    pub count: u64,
    pub limit: u64,
    pub offset: u64,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VersionView {
    pub id: i32,
    pub label: String,
    pub status: String,
    pub description: String,
    pub environment: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<models::version::Model> for VersionView {
    fn from(m: models::version::Model) -> Self {
        Self {
            id: m.id,
            label: m.label,
            status: m.status,
            description: m.description,
            environment: m.environment,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// A single service. Exactly one of `version_count` (collapsed form) and
/// `versions` (expanded form) is set.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versions: Option<Vec<VersionView>>,
}

impl ServiceView {
    pub fn collapsed(m: models::service::Model, version_count: u64) -> Self {
        Self::base(m, Some(version_count), None)
    }

    pub fn expanded(m: models::service::Model, versions: Vec<models::version::Model>) -> Self {
        let versions = versions.into_iter().map(VersionView::from).collect();
        Self::base(m, None, Some(versions))
    }

    fn base(m: models::service::Model, version_count: Option<u64>, versions: Option<Vec<VersionView>>) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            created_at: m.created_at,
            updated_at: m.updated_at,
            version_count,
            versions,
        }
    }
}
