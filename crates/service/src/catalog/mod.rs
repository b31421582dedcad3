//! Catalog module: three-layer architecture (domain, repository, service)
//! plus the boundary validation of raw request parameters.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;
pub mod validation;

pub use service::ServiceCatalog;
