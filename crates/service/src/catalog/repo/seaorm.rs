use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, TransactionTrait, ActiveModelTrait,
};
use tracing::debug;

use models::{service, version::{self, NewVersion}};

use crate::catalog::domain::{ServiceQuery, SortOrder};
use crate::catalog::repository::ServiceRepository;
use crate::errors::ServiceError;

pub struct SeaOrmServiceRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmServiceRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

impl From<SortOrder> for Order {
    fn from(s: SortOrder) -> Self {
        match s {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        }
    }
}

/// Services matching the optional exact-name filter.
pub(crate) fn filtered(name: Option<&str>) -> Select<service::Entity> {
    let finder = service::Entity::find();
    match name {
        Some(n) => finder.filter(service::Column::Name.eq(n)),
        None => finder,
    }
}

/// One page of services. Ties under a name sort, and the unsorted case, fall back to id order.
pub(crate) fn page_query(q: &ServiceQuery) -> Select<service::Entity> {
    let mut finder = filtered(q.name.as_deref());
    if let Some(sort) = q.sort {
        finder = finder.order_by(service::Column::Name, sort.into());
    }
    finder
        .order_by_asc(service::Column::Id)
        .offset(q.offset)
        .limit(q.limit)
}

#[async_trait::async_trait]
impl ServiceRepository for SeaOrmServiceRepository {
    async fn count(&self, name: Option<&str>) -> Result<u64, ServiceError> {
        Ok(filtered(name).count(&self.db).await?)
    }

    async fn find(&self, query: &ServiceQuery) -> Result<Vec<service::Model>, ServiceError> {
        Ok(page_query(query).all(&self.db).await?)
    }

    async fn find_one(&self, id: i32) -> Result<Option<service::Model>, ServiceError> {
        Ok(service::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_versions(&self, service_id: i32) -> Result<Vec<version::Model>, ServiceError> {
        let rows = version::Entity::find()
            .filter(version::Column::ServiceId.eq(service_id))
            .order_by_asc(version::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn count_versions(&self, service_ids: &[i32]) -> Result<HashMap<i32, u64>, ServiceError> {
        if service_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(i32, i64)> = version::Entity::find()
            .select_only()
            .column(version::Column::ServiceId)
            .column_as(version::Column::Id.count(), "version_count")
            .filter(version::Column::ServiceId.is_in(service_ids.iter().copied()))
            .group_by(version::Column::ServiceId)
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|(id, n)| (id, n.max(0) as u64)).collect())
    }

    async fn create(
        &self,
        name: &str,
        description: &str,
        versions: Vec<NewVersion>,
    ) -> Result<(service::Model, Vec<version::Model>), ServiceError> {
        let row = service::new_active_model(name, description)?;
        // 父子记录在同一事务中写入；任一失败则整体回滚
        let txn = self.db.begin().await?;
        let created = row.insert(&txn).await?;
        let mut children = Vec::with_capacity(versions.len());
        for v in versions {
            children.push(v.into_active_model(created.id).insert(&txn).await?);
        }
        txn.commit().await?;
        debug!(service_id = created.id, versions = children.len(), "service rows committed");
        Ok((created, children))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn sql(select: Select<service::Entity>) -> String {
        select.build(DbBackend::Postgres).to_string()
    }

    fn query(name: Option<&str>, sort: Option<SortOrder>, limit: u64, offset: u64) -> ServiceQuery {
        ServiceQuery { name: name.map(str::to_string), sort, limit, offset }
    }

    #[test]
    fn filter_is_exact_equality() {
        let s = sql(filtered(Some("billing")));
        assert!(s.contains(r#"WHERE "service"."name" = 'billing'"#), "{s}");
        assert!(!s.to_uppercase().contains("LIKE"), "{s}");
    }

    #[test]
    fn no_filter_has_no_where_clause() {
        let s = sql(filtered(None));
        assert!(!s.contains("WHERE"), "{s}");
    }

    #[test]
    fn page_query_orders_by_name_then_id() {
        let s = sql(page_query(&query(None, Some(SortOrder::Desc), 12, 24)));
        assert!(s.contains(r#"ORDER BY "service"."name" DESC, "service"."id" ASC"#), "{s}");
        assert!(s.contains("LIMIT 12"), "{s}");
        assert!(s.contains("OFFSET 24"), "{s}");
    }

    #[test]
    fn unsorted_page_uses_id_order() {
        let s = sql(page_query(&query(Some("a"), None, 5, 0)));
        assert!(s.contains(r#"ORDER BY "service"."id" ASC"#), "{s}");
        assert!(!s.contains(r#""service"."name" ASC"#), "{s}");
    }

    mod db {
        use super::*;
        use crate::catalog::domain::{CreateServiceInput, CreateVersionInput, ListParams};
        use crate::catalog::ServiceCatalog;
        use crate::test_support::get_db;
        use std::sync::Arc;

        fn unique(prefix: &str) -> String {
            format!("{prefix}-{}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
        }

        #[tokio::test]
        async fn create_cascades_versions_in_one_transaction() -> Result<(), anyhow::Error> {
            let Some(db) = get_db().await? else { return Ok(()) };
            let repo = SeaOrmServiceRepository::new(db.clone());
            let name = unique("svc");
            let versions = vec![
                NewVersion { label: "v1".into(), status: "live".into(), ..Default::default() },
                NewVersion { label: "v2".into(), status: "draft".into(), environment: "staging".into(), ..Default::default() },
            ];

            let (svc, children) = repo.create(&name, "", versions).await?;
            assert_eq!(children.len(), 2);
            assert!(children.iter().all(|v| v.service_id == svc.id));

            let counts = repo.count_versions(&[svc.id]).await?;
            assert_eq!(counts.get(&svc.id), Some(&2));
            let found = repo.find_versions(svc.id).await?;
            assert_eq!(found.iter().map(|v| v.label.as_str()).collect::<Vec<_>>(), ["v1", "v2"]);

            // cleanup; versions go with the service via ON DELETE CASCADE
            service::Entity::delete_by_id(svc.id).exec(&db).await?;
            assert!(repo.find_versions(svc.id).await?.is_empty());
            Ok(())
        }

        #[tokio::test]
        async fn failed_child_insert_rolls_back_parent() -> Result<(), anyhow::Error> {
            let Some(db) = get_db().await? else { return Ok(()) };
            let repo = SeaOrmServiceRepository::new(db.clone());
            let name = unique("rollback");
            // status wider than the column: rejected by postgres, not by the model checks
            let versions = vec![NewVersion { label: "v1".into(), status: "s".repeat(61), ..Default::default() }];

            assert!(repo.create(&name, "", versions).await.is_err());
            assert_eq!(repo.count(Some(&name)).await?, 0);
            Ok(())
        }

        #[tokio::test]
        async fn catalog_round_trip_against_postgres() -> Result<(), anyhow::Error> {
            let Some(db) = get_db().await? else { return Ok(()) };
            let catalog = ServiceCatalog::new(Arc::new(SeaOrmServiceRepository::new(db.clone())));
            let name = unique("round-trip");
            let created = catalog
                .create(CreateServiceInput {
                    name: Some(name.clone()),
                    versions: Some(vec![CreateVersionInput { label: "v1".into(), status: "live".into(), ..Default::default() }]),
                    ..Default::default()
                })
                .await?;

            let page = catalog.find_all(&ListParams { filter: Some(name.clone()), ..Default::default() }).await?;
            assert_eq!(page.count, 1);
            assert_eq!(page.services[0].id, created.id);
            assert_eq!(page.services[0].version_count, 1);

            let expanded = catalog.find_by_id(created.id, true).await?.expect("service exists");
            assert_eq!(expanded.versions.map(|v| v.len()), Some(1));

            service::Entity::delete_by_id(created.id).exec(&db).await?;
            assert!(catalog.find_by_id(created.id, false).await?.is_none());
            Ok(())
        }
    }
}
