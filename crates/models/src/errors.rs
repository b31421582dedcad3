use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
}

impl ModelError {
    pub(crate) fn too_long(field: &str, max: usize, actual: usize) -> Self {
        Self::Validation(format!("'{field}' must be at most {max} characters but has {actual}"))
    }
}
