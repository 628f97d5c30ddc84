use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already filled today")]
    AlreadyFilledToday,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn storage(err: impl std::fmt::Display) -> Self { Self::Storage(err.to_string()) }

    /// Text safe to show to an end user. Storage details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Validation(msg) | ServiceError::NotFound(msg) | ServiceError::Conflict(msg) => msg.clone(),
            ServiceError::AlreadyFilledToday => "Points were already submitted today".into(),
            ServiceError::Storage(_) => "Server error".into(),
        }
    }
}
