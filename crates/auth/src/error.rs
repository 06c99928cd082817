use thiserror::Error;

/// A rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Field details are logged, not shown to the user.
    #[error("{intent} data validation failed")]
    Validation {
        intent: &'static str,
        #[source]
        source: ValidationError,
    },

    /// The server answered with `success: false`.
    #[error("{0}")]
    Rejected(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl AuthError {
    pub fn from_validation(intent: &'static str, source: ValidationError) -> Self {
        tracing::error!("{} validation error: {}", intent, source);
        AuthError::Validation { intent, source }
    }
}
