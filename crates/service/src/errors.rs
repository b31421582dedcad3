use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid '{name}' parameter - expected {expected} but received {received}")]
    InvalidParameter { name: String, expected: String, received: String },
    #[error("Invalid 'limit'/'offset' parameters - expected both but received '{limit}'/'{offset}'")]
    InvalidPaginationPair { limit: String, offset: String },
    #[error("{0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    /// No service is stored under `id`; `id` is echoed as received.
    pub fn not_found(id: impl std::fmt::Display) -> Self { Self::NotFound(format!("No Service with id {id}")) }

    pub fn invalid_parameter(name: &str, expected: impl Into<String>, received: &str) -> Self {
        Self::InvalidParameter { name: name.to_string(), expected: expected.into(), received: received.to_string() }
    }

    /// True for failures caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        match self {
            ServiceError::InvalidParameter { .. }
            | ServiceError::InvalidPaginationPair { .. } => true,
            ServiceError::Model(models::errors::ModelError::Validation(_)) => true,
            _ => false,
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self { Self::Db(e.to_string()) }
}
