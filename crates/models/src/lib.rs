//! Relational schema of the catalog: `service` rows own `version` rows.

pub mod errors;
pub mod db;
pub mod service;
pub mod version;
