//! Create `version` table.
//! Each row belongs to exactly one service and goes away with it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Version::Table)
                    .if_not_exists()
                    .col(pk_auto(Version::Id))
                    .col(integer(Version::ServiceId))
                    .col(string_len(Version::Label, 60))
                    .col(string_len(Version::Status, 60))
                    .col(string_len(Version::Description, 200).default(""))
                    .col(string_len(Version::Environment, 60).default(""))
                    .col(timestamp_with_time_zone(Version::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Version::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_version_service")
                            .from(Version::Table, Version::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Version::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Version {
    Table,
    Id,
    ServiceId,
    Label,
    Status,
    Description,
    Environment,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Service { Table, Id }
