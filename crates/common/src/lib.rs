//! Shared building blocks used by every crate in the workspace:
//! wire types that are not tied to the catalog domain and logging setup.

pub mod types;
pub mod utils;
