use std::sync::Arc;

use tracing::{info, instrument};

use models::{service, version::NewVersion};

use super::domain::{CreateServiceInput, ListParams, ServiceList, ServiceQuery, ServiceSummary, ServiceView};
use super::repository::ServiceRepository;
use crate::errors::ServiceError;

/// Catalog queries and the create workflow, independent of web framework.
pub struct ServiceCatalog<R: ServiceRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: ServiceRepository + ?Sized> ServiceCatalog<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// One page of services with versions collapsed to counts.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::catalog::{ServiceCatalog, domain::{CreateServiceInput, ListParams}, repository::mock::MockServiceRepository};
    /// let catalog = ServiceCatalog::new(Arc::new(MockServiceRepository::default()));
    /// let input = CreateServiceInput { name: Some("billing".into()), ..Default::default() };
    /// tokio_test::block_on(catalog.create(input)).unwrap();
    /// let page = tokio_test::block_on(catalog.find_all(&ListParams::default())).unwrap();
    /// assert_eq!(page.count, 1);
    /// assert_eq!(page.limit, 12);
    /// assert_eq!(page.services[0].version_count, 0);
    /// ```
    #[instrument(skip(self), fields(filter = ?params.filter, sort = ?params.sort))]
    pub async fn find_all(&self, params: &ListParams) -> Result<ServiceList, ServiceError> {
        let count = self.repo.count(params.filter.as_deref()).await?;
        let rows = self.repo.find(&ServiceQuery::from(params)).await?;
        let ids: Vec<i32> = rows.iter().map(|s| s.id).collect();
        let counts = self.repo.count_versions(&ids).await?;
        let services = rows
            .into_iter()
            .map(|s| {
                let version_count = counts.get(&s.id).copied().unwrap_or(0);
                ServiceSummary {
                    id: s.id,
                    name: s.name,
                    description: s.description,
                    created_at: s.created_at,
                    updated_at: s.updated_at,
                    version_count,
                }
            })
            .collect();
        Ok(ServiceList {
            services,
            count,
            limit: params.pagination.limit,
            offset: params.pagination.offset,
        })
    }

    /// `Ok(None)` when no service has this id.
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32, expand_versions: bool) -> Result<Option<ServiceView>, ServiceError> {
        let Some(found) = self.repo.find_one(id).await? else { return Ok(None) };
        let view = if expand_versions {
            let versions = self.repo.find_versions(id).await?;
            ServiceView::expanded(found, versions)
        } else {
            let counts = self.repo.count_versions(&[id]).await?;
            ServiceView::collapsed(found, counts.get(&id).copied().unwrap_or(0))
        };
        Ok(Some(view))
    }

    /// Create a service together with its versions.
    ///
    /// Blank names become [`service::DEFAULT_NAME`]; lengths are checked before anything is written.
    #[instrument(skip(self, input), fields(versions = input.versions.as_ref().map_or(0, Vec::len)))]
    pub async fn create(&self, input: CreateServiceInput) -> Result<ServiceView, ServiceError> {
        let name = service::name_or_default(input.name.as_deref());
        let description = input.description.unwrap_or_default();
        service::validate_name(&name)?;
        service::validate_description(&description)?;

        let versions: Vec<NewVersion> = input
            .versions
            .unwrap_or_default()
            .into_iter()
            .map(|v| NewVersion {
                label: v.label,
                status: v.status,
                description: v.description.unwrap_or_default(),
                environment: v.environment.unwrap_or_default(),
            })
            .collect();
        for v in &versions {
            v.validate()?;
        }

        let (created, children) = self.repo.create(&name, &description, versions).await?;
        info!(service_id = created.id, name = %created.name, versions = children.len(), "service_created");
        Ok(ServiceView::expanded(created, children))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::domain::{CreateVersionInput, SortOrder};
    use crate::catalog::repository::mock::MockServiceRepository;
    use crate::pagination::Pagination;

    fn catalog() -> ServiceCatalog<MockServiceRepository> {
        ServiceCatalog::new(Arc::new(MockServiceRepository::default()))
    }

    fn named(name: &str) -> CreateServiceInput {
        CreateServiceInput { name: Some(name.into()), ..Default::default() }
    }

    fn version(label: &str) -> CreateVersionInput {
        CreateVersionInput { label: label.into(), status: "live".into(), ..Default::default() }
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let page = catalog().find_all(&ListParams::default()).await.unwrap();
        assert!(page.services.is_empty());
        assert_eq!((page.count, page.limit, page.offset), (0, 12, 0));
    }

    #[tokio::test]
    async fn create_defaults_name_and_versions() {
        let c = catalog();
        let created = c.create(CreateServiceInput::default()).await.unwrap();
        assert_eq!(created.name, service::DEFAULT_NAME);
        assert_eq!(created.description, "");
        assert_eq!(created.versions.as_deref().map(<[_]>::len), Some(0));

        let blank = c.create(named("  ")).await.unwrap();
        assert_eq!(blank.name, service::DEFAULT_NAME);
    }

    #[tokio::test]
    async fn created_versions_are_counted_and_expandable() {
        let c = catalog();
        let input = CreateServiceInput {
            name: Some("billing".into()),
            versions: Some(vec![version("v1"), version("v2"), version("v3")]),
            ..Default::default()
        };
        let created = c.create(input).await.unwrap();
        let versions = created.versions.clone().unwrap();
        assert_eq!(versions.len(), 3);
        assert!(versions.windows(2).all(|w| w[0].id < w[1].id));

        let page = c.find_all(&ListParams::default()).await.unwrap();
        assert_eq!(page.services[0].version_count, 3);

        let collapsed = c.find_by_id(created.id, false).await.unwrap().unwrap();
        assert_eq!(collapsed.version_count, Some(3));
        assert!(collapsed.versions.is_none());

        let expanded = c.find_by_id(created.id, true).await.unwrap().unwrap();
        let labels: Vec<_> = expanded.versions.unwrap().into_iter().map(|v| v.label).collect();
        assert_eq!(labels, ["v1", "v2", "v3"]);
        assert!(expanded.version_count.is_none());
    }

    #[tokio::test]
    async fn missing_id_is_none_not_error() {
        assert!(catalog().find_by_id(999, true).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn filter_matches_whole_name_only() {
        let c = catalog();
        for n in ["billing", "billing-eu", "auth"] {
            c.create(named(n)).await.unwrap();
        }
        let params = ListParams { filter: Some("billing".into()), ..Default::default() };
        let page = c.find_all(&params).await.unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.services.len(), 1);
        assert_eq!(page.services[0].name, "billing");
    }

    #[tokio::test]
    async fn count_ignores_page_window() {
        let c = catalog();
        for n in ["c", "a", "d", "b"] {
            c.create(named(n)).await.unwrap();
        }
        let params = ListParams { sort: Some(SortOrder::Asc), pagination: Pagination::new(2, 1), ..Default::default() };
        let page = c.find_all(&params).await.unwrap();
        assert_eq!(page.count, 4);
        let names: Vec<_> = page.services.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["b", "c"]);
        assert_eq!((page.limit, page.offset), (2, 1));
    }

    #[tokio::test]
    async fn descending_sort_reverses_names() {
        let c = catalog();
        for n in ["b", "c", "a"] {
            c.create(named(n)).await.unwrap();
        }
        let params = ListParams { sort: Some(SortOrder::Desc), ..Default::default() };
        let names: Vec<_> = c.find_all(&params).await.unwrap().services.into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["c", "b", "a"]);
    }

    #[tokio::test]
    async fn over_long_fields_fail_before_writing() {
        let c = catalog();
        let err = c.create(named(&"n".repeat(61))).await.unwrap_err();
        assert!(err.is_client_error());

        let bad_version = CreateServiceInput {
            versions: Some(vec![CreateVersionInput { label: "l".repeat(61), status: "live".into(), ..Default::default() }]),
            ..Default::default()
        };
        assert!(c.create(bad_version).await.unwrap_err().is_client_error());
        assert_eq!(c.find_all(&ListParams::default()).await.unwrap().count, 0);
    }

    #[tokio::test]
    async fn repository_failures_propagate() {
        let c = ServiceCatalog::new(Arc::new(MockServiceRepository::failing()));
        let err = c.find_all(&ListParams::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Db(_)));
        assert!(c.find_by_id(1, false).await.is_err());
        assert!(c.create(CreateServiceInput::default()).await.is_err());
    }
}
