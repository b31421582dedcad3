use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Service: non-unique index on name (exact-name filter and name sort)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_service_name")
                    .table(Service::Table)
                    .col(Service::Name)
                    .to_owned(),
            )
            .await?;

        // Version: index on service_id for the per-service lookups and counts
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_version_service")
                    .table(Version::Table)
                    .col(Version::ServiceId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_service_name").table(Service::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_version_service").table(Version::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Service { Table, Name }

#[derive(DeriveIden)]
enum Version { Table, ServiceId }
