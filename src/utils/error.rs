use thiserror::Error;

#[derive(Error, Debug)]
pub enum LitterbookError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },

    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Upstream failure: {message}")]
    UpstreamFailure { message: String },
}

impl LitterbookError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn already_exists(entity: &'static str, id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity,
            id: id.into(),
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamFailure {
            message: message.into(),
        }
    }
}

// Transport errors from the summarizer client (timeouts included) are all
// upstream failures as far as callers are concerned.
impl From<reqwest::Error> for LitterbookError {
    fn from(e: reqwest::Error) -> Self {
        Self::UpstreamFailure {
            message: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LitterbookError>;
