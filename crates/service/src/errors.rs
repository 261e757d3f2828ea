use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn invalid_user() -> Self { Self::Validation("Invalid user data.".into()) }

    pub fn user_exists(id: &str) -> Self { Self::Conflict(format!("User with ID {} already exists.", id)) }

    pub fn user_not_found(id: &str) -> Self { Self::NotFound(format!("User with ID {} not found.", id)) }

    /// Message meant for the caller, without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Validation(m) | Self::Conflict(m) | Self::NotFound(m) | Self::Storage(m) => m.clone(),
            Self::Model(models::errors::ModelError::Validation(m)) => m.clone(),
        }
    }
}
