/// Message surfaced when no HTTP response was received.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "network request failed";

/// Message surfaced when a success response could not be decoded.
pub const DECODE_FAILURE_MESSAGE: &str = "response could not be decoded";

/// Coarse classification of a [`FetchError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// No response was received.
    Transport,
    /// A non-success status was received.
    Http,
    /// The success body did not decode.
    Decode,
    /// The request was never sent.
    InvalidRequest,
}

impl ErrorKind {
    /// Stable snake_case name, used as a log field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Http => "http",
            Self::Decode => "decode",
            Self::InvalidRequest => "invalid_request",
        }
    }
}

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-success HTTP status code observed on the final attempt.
    #[error("http error {status}: {message}")]
    Http {
        status: u16,
        /// Server-provided `message` field, or a default derived from the status.
        message: String,
        /// Raw response body.
        body: String,
    },
    /// Success response whose body is not valid JSON for the requested type.
    ///
    /// The detail (including the offending body) is kept for `Display`;
    /// [`FetchError::message`] returns [`DECODE_FAILURE_MESSAGE`].
    #[error("decode error: {0}")]
    Decode(String),
    /// The request could not be constructed (bad URL, header or body).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl FetchError {
    /// Returns the error classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Transport,
            Self::Http { .. } => ErrorKind::Http,
            Self::Decode(_) => ErrorKind::Decode,
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
        }
    }

    /// HTTP status of the failing response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable message suitable for presenting to a user.
    pub fn message(&self) -> &str {
        match self {
            Self::Transport(_) => TRANSPORT_FAILURE_MESSAGE,
            Self::Http { message, .. } => message.as_str(),
            Self::Decode(_) => DECODE_FAILURE_MESSAGE,
            Self::InvalidRequest(message) => message.as_str(),
        }
    }

    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Http { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, FetchError, DECODE_FAILURE_MESSAGE};

    #[test]
    fn http_error_exposes_status_and_message() {
        let err = FetchError::Http {
            status: 503,
            message: "maintenance".to_owned(),
            body: r#"{"message":"maintenance"}"#.to_owned(),
        };

        assert_eq!(err.kind(), ErrorKind::Http);
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.message(), "maintenance");
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "http error 503: maintenance");
    }

    #[test]
    fn decode_and_invalid_request_errors_are_terminal() {
        let decode = FetchError::Decode("expected value at line 1 column 1".to_owned());
        let invalid = FetchError::InvalidRequest("url must not be empty".to_owned());

        assert!(!decode.is_retryable());
        assert!(!invalid.is_retryable());
        assert_eq!(decode.status(), None);
        assert_eq!(decode.message(), DECODE_FAILURE_MESSAGE);
        assert!(decode.to_string().contains("expected value"));
        assert_eq!(invalid.kind().as_str(), "invalid_request");
        assert_eq!(invalid.message(), "url must not be empty");
    }
}
