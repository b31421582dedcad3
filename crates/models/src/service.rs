use sea_orm::{entity::prelude::*, ActiveValue::NotSet, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, version};

/// Stored when a service is created without a usable name.
pub const DEFAULT_NAME: &str = "DefaultServiceName";
pub const NAME_MAX_LEN: usize = 60;
pub const DESCRIPTION_MAX_LEN: usize = 200;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Version,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Version => Entity::has_many(version::Entity).into(),
        }
    }
}

impl Related<version::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Version.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    check_len("name", name, NAME_MAX_LEN)
}

pub fn validate_description(description: &str) -> Result<(), errors::ModelError> {
    check_len("description", description, DESCRIPTION_MAX_LEN)
}

/// Blank or missing names fall back to [`DEFAULT_NAME`].
pub fn name_or_default(name: Option<&str>) -> String {
    match name {
        Some(n) if !n.trim().is_empty() => n.to_string(),
        _ => DEFAULT_NAME.to_string(),
    }
}

/// Build an insertable row; the id is left to the database sequence.
pub fn new_active_model(name: &str, description: &str) -> Result<ActiveModel, errors::ModelError> {
    validate_name(name)?;
    validate_description(description)?;
    let now = Utc::now().into();
    Ok(ActiveModel {
        id: NotSet,
        name: Set(name.to_string()),
        description: Set(description.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    })
}

pub(crate) fn check_len(field: &str, value: &str, max: usize) -> Result<(), errors::ModelError> {
    let len = value.chars().count();
    if len > max {
        return Err(errors::ModelError::too_long(field, max, len));
    }
    Ok(())
}
