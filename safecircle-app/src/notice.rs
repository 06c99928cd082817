use crate::flow::FlowError;

/// A user-facing error message. Empty messages are never shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    message: String,
}

impl ErrorNotice {
    pub fn new(message: impl Into<String>) -> Option<Self> {
        let message = message.into();
        if message.trim().is_empty() {
            tracing::error!("Message cannot be empty for error notice");
            return None;
        }
        Some(Self { message })
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn from_flow_error(error: &FlowError) -> Option<Self> {
        Self::new(error.to_string())
    }
}

impl std::fmt::Display for ErrorNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "❌ {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_message_is_rejected() {
        assert!(ErrorNotice::new("").is_none());
        assert!(ErrorNotice::new("   ").is_none());
    }

    #[test]
    fn test_notice_display() {
        let notice = ErrorNotice::new("Invalid code").unwrap();
        assert_eq!(notice.message(), "Invalid code");
        assert_eq!(notice.to_string(), "❌ Invalid code");
    }

    #[test]
    fn test_from_flow_error() {
        let notice = ErrorNotice::from_flow_error(&FlowError::IncompleteCode).unwrap();
        assert_eq!(notice.message(), "Please enter a valid 6-digit code");
    }
}
