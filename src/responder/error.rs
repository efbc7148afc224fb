//! Responder error type.

use thiserror::Error;

/// Failures a responder can report mid-stream.
///
/// Any of these ends the turn: the assistant message is marked failed with
/// whatever content had already arrived.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// The stream dropped before it finished
    #[error("Stream connection lost: {0}")]
    ConnectionLost(String),

    /// The responder reported an error of its own
    #[error("Responder error: {0}")]
    Backend(String),

    /// No fragment arrived in time
    #[error("Stream timed out after {duration_secs}s")]
    Timeout { duration_secs: u64 },
}

impl StreamError {
    /// Whether retrying the same prompt can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StreamError::ConnectionLost(_) | StreamError::Timeout { .. }
        )
    }

    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::ConnectionLost(_) => "stream_connection_lost",
            StreamError::Backend(_) => "stream_backend_error",
            StreamError::Timeout { .. } => "stream_timeout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            StreamError::Timeout { duration_secs: 30 }.to_string(),
            "Stream timed out after 30s"
        );
        assert_eq!(
            StreamError::Backend("overloaded".to_string()).to_string(),
            "Responder error: overloaded"
        );
    }

    #[test]
    fn test_retryable() {
        assert!(StreamError::ConnectionLost("eof".to_string()).is_retryable());
        assert!(!StreamError::Backend("bad prompt".to_string()).is_retryable());
    }
}
