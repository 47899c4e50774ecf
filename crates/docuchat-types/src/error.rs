use thiserror::Error;

/// Errors from backend HTTP and streaming operations.
///
/// Kept as plain strings so this crate stays free of HTTP client types;
/// the infrastructure layer converts `reqwest` errors at the boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("stream error: {0}")]
    Stream(String),
}

/// Errors from conversation and session-management rules.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("a response is already in flight")]
    Busy,

    #[error("message is empty")]
    EmptyMessage,

    #[error("title cannot be empty")]
    EmptyTitle,

    #[error("no session is selected")]
    NoActiveSession,

    #[error("session '{0}' not found")]
    SessionNotFound(String),

    #[error("no reset is pending confirmation")]
    NoPendingReset,

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Status {
            status: 503,
            body: "service unavailable".to_string(),
        };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("service unavailable"));
    }

    #[test]
    fn test_chat_error_from_api_error() {
        let err: ChatError = ApiError::Transport("connection refused".to_string()).into();
        assert!(matches!(err, ChatError::Api(_)));
        assert!(err.to_string().contains("connection refused"));
    }
}
