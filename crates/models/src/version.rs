use sea_orm::{entity::prelude::*, ActiveValue::NotSet, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, service};

pub const LABEL_MAX_LEN: usize = 60;
pub const STATUS_MAX_LEN: usize = 60;
pub const DESCRIPTION_MAX_LEN: usize = 200;
pub const ENVIRONMENT_MAX_LEN: usize = 60;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "version")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub service_id: i32,
    pub label: String,
    pub status: String,
    pub description: String,
    pub environment: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Service,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Service => Entity::belongs_to(service::Entity)
                .from(Column::ServiceId)
                .to(service::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Column values of a version that is about to be inserted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewVersion {
    pub label: String,
    pub status: String,
    pub description: String,
    pub environment: String,
}

impl NewVersion {
    pub fn validate(&self) -> Result<(), errors::ModelError> {
        if self.status.trim().is_empty() {
            return Err(errors::ModelError::Validation("'status' is required".into()));
        }
        service::check_len("label", &self.label, LABEL_MAX_LEN)?;
        service::check_len("status", &self.status, STATUS_MAX_LEN)?;
        service::check_len("description", &self.description, DESCRIPTION_MAX_LEN)?;
        service::check_len("environment", &self.environment, ENVIRONMENT_MAX_LEN)?;
        Ok(())
    }

    /// Insertable row owned by `service_id`.
    pub fn into_active_model(self, service_id: i32) -> ActiveModel {
        let now = Utc::now().into();
        ActiveModel {
            id: NotSet,
            service_id: Set(service_id),
            label: Set(self.label),
            status: Set(self.status),
            description: Set(self.description),
            environment: Set(self.environment),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}
