use std::collections::HashMap;

use async_trait::async_trait;
use models::{service, version::{self, NewVersion}};

use super::domain::ServiceQuery;
use crate::errors::ServiceError;

/// Persistence gateway for services and their versions.
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// Rows whose name equals `name` (all rows when `None`).
    async fn count(&self, name: Option<&str>) -> Result<u64, ServiceError>;
    async fn find(&self, query: &ServiceQuery) -> Result<Vec<service::Model>, ServiceError>;
    async fn find_one(&self, id: i32) -> Result<Option<service::Model>, ServiceError>;
    /// Versions of one service in insertion order.
    async fn find_versions(&self, service_id: i32) -> Result<Vec<version::Model>, ServiceError>;
    /// Version counts keyed by service id; services without versions may be missing.
    async fn count_versions(&self, service_ids: &[i32]) -> Result<HashMap<i32, u64>, ServiceError>;
    /// Insert a service and its versions as one unit.
    async fn create(
        &self,
        name: &str,
        description: &str,
        versions: Vec<NewVersion>,
    ) -> Result<(service::Model, Vec<version::Model>), ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    use chrono::Utc;

    use crate::catalog::domain::SortOrder;

    #[derive(Default)]
    struct Tables {
        services: Vec<service::Model>,
        versions: Vec<version::Model>,
        next_service_id: i32,
        next_version_id: i32,
    }

    #[derive(Default)]
    pub struct MockServiceRepository {
        tables: Mutex<Tables>,
        failing: bool,
    }

    impl MockServiceRepository {
        /// A repository whose every call fails like a lost database connection.
        pub fn failing() -> Self {
            Self { failing: true, ..Self::default() }
        }

        fn check(&self) -> Result<(), ServiceError> {
            if self.failing {
                return Err(ServiceError::Db("connection refused".into()));
            }
            Ok(())
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
            self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }

    #[async_trait]
    impl ServiceRepository for MockServiceRepository {
        async fn count(&self, name: Option<&str>) -> Result<u64, ServiceError> {
            self.check()?;
            let t = self.lock();
            Ok(t.services.iter().filter(|s| name.map_or(true, |n| s.name == n)).count() as u64)
        }

        async fn find(&self, query: &ServiceQuery) -> Result<Vec<service::Model>, ServiceError> {
            self.check()?;
            let t = self.lock();
            let mut rows: Vec<service::Model> = t
                .services
                .iter()
                .filter(|s| query.name.as_deref().map_or(true, |n| s.name == n))
                .cloned()
                .collect();
            match query.sort {
                Some(SortOrder::Asc) => rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id))),
                Some(SortOrder::Desc) => rows.sort_by(|a, b| b.name.cmp(&a.name).then(a.id.cmp(&b.id))),
                None => {}
            }
            Ok(rows
                .into_iter()
                .skip(usize::try_from(query.offset).unwrap_or(usize::MAX))
                .take(usize::try_from(query.limit).unwrap_or(usize::MAX))
                .collect())
        }

        async fn find_one(&self, id: i32) -> Result<Option<service::Model>, ServiceError> {
            self.check()?;
            Ok(self.lock().services.iter().find(|s| s.id == id).cloned())
        }

        async fn find_versions(&self, service_id: i32) -> Result<Vec<version::Model>, ServiceError> {
            self.check()?;
            Ok(self.lock().versions.iter().filter(|v| v.service_id == service_id).cloned().collect())
        }

        async fn count_versions(&self, service_ids: &[i32]) -> Result<HashMap<i32, u64>, ServiceError> {
            self.check()?;
            let t = self.lock();
            let mut counts = HashMap::new();
            for v in t.versions.iter().filter(|v| service_ids.contains(&v.service_id)) {
                *counts.entry(v.service_id).or_insert(0) += 1;
            }
            Ok(counts)
        }

        async fn create(
            &self,
            name: &str,
            description: &str,
            versions: Vec<NewVersion>,
        ) -> Result<(service::Model, Vec<version::Model>), ServiceError> {
            self.check()?;
            let mut t = self.lock();
            let now = Utc::now().into();
            t.next_service_id += 1;
            let svc = service::Model {
                id: t.next_service_id,
                name: name.to_string(),
                description: description.to_string(),
                created_at: now,
                updated_at: now,
            };
            let mut created = Vec::with_capacity(versions.len());
            for v in versions {
                t.next_version_id += 1;
                created.push(version::Model {
                    id: t.next_version_id,
                    service_id: svc.id,
                    label: v.label,
                    status: v.status,
                    description: v.description,
                    environment: v.environment,
                    created_at: now,
                    updated_at: now,
                });
            }
            t.services.push(svc.clone());
            t.versions.extend(created.iter().cloned());
            Ok((svc, created))
        }
    }
}
