//! Error types for image editing sessions.

use std::path::PathBuf;
use std::time::Duration;

/// Longest remote error text kept in an error value.
const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Errors that can occur while encoding, validating, or transforming an image.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// Local image file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Submit attempted without an image or a prompt.
    #[error("validation failed: {0}")]
    Validation(String),

    /// API key missing or invalid.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Sanitized response body.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Server-suggested delay, when the response carried one.
        retry_after: Option<Duration>,
    },

    /// Billing is not enabled for the API key.
    #[error("billing error: {0}")]
    Billing(String),

    /// Remote call exceeded the configured timeout.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// Content was blocked by safety filters.
    #[error("content blocked: {0}")]
    ContentBlocked(String),

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Response was well-formed but did not contain an image.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode base64 data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// I/O error (e.g., saving a result).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// In-flight request was cancelled by the user.
    #[error("request cancelled")]
    Cancelled,
}

/// The three failure classes a session reports to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The local file could not be read.
    Read,
    /// Submit preconditions were not met.
    Validation,
    /// The remote transformation failed, for any reason.
    Transform,
}

impl EditorError {
    /// Classifies this error for user-facing reporting.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Read { .. } => FailureKind::Read,
            Self::Validation(_) => FailureKind::Validation,
            _ => FailureKind::Transform,
        }
    }
}

/// Result type alias for image editing operations.
pub type Result<T> = std::result::Result<T, EditorError>;

/// Parses a `Retry-After` header given in seconds.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Redacts API keys echoed back by a service and caps the message length.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len().min(MAX_ERROR_MESSAGE_LEN));
    for (i, word) in text.split(' ').enumerate() {
        if i > 0 {
            cleaned.push(' ');
        }
        if let Some(pos) = word.find("key=") {
            cleaned.push_str(&word[..pos + 4]);
            cleaned.push_str("[REDACTED]");
        } else if word.starts_with("AIza") && word.len() > 30 {
            cleaned.push_str("[REDACTED]");
        } else {
            cleaned.push_str(word);
        }
    }

    if cleaned.chars().count() > MAX_ERROR_MESSAGE_LEN {
        let mut truncated: String = cleaned.chars().take(MAX_ERROR_MESSAGE_LEN).collect();
        truncated.push_str("...");
        truncated
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let read = EditorError::Read {
            path: PathBuf::from("cat.png"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(read.kind(), FailureKind::Read);
        assert_eq!(
            EditorError::Validation("no image".into()).kind(),
            FailureKind::Validation
        );
        assert_eq!(EditorError::Auth("bad key".into()).kind(), FailureKind::Transform);
        assert_eq!(EditorError::Cancelled.kind(), FailureKind::Transform);
        assert_eq!(
            EditorError::Decode("bad base64".into()).kind(),
            FailureKind::Transform
        );
    }

    #[test]
    fn test_error_display() {
        let err = EditorError::Api {
            status: 404,
            message: "Not found".into(),
        };
        assert_eq!(err.to_string(), "API error: 404 - Not found");

        let err = EditorError::ContentBlocked("Safety filter triggered".into());
        assert_eq!(err.to_string(), "content blocked: Safety filter triggered");
    }

    #[test]
    fn test_sanitize_redacts_keys() {
        let msg = sanitize_error_message("bad request for url ?key=secret123 and more");
        assert_eq!(msg, "bad request for url ?key=[REDACTED] and more");

        let msg = sanitize_error_message("invalid AIzaSyA1234567890abcdefghijklmnopqrstu");
        assert_eq!(msg, "invalid [REDACTED]");
    }

    #[test]
    fn test_sanitize_truncates() {
        let long = "x".repeat(2 * MAX_ERROR_MESSAGE_LEN);
        let msg = sanitize_error_message(&long);
        assert_eq!(msg.len(), MAX_ERROR_MESSAGE_LEN + 3);
        assert!(msg.ends_with("..."));
    }

    #[test]
    fn test_parse_retry_after() {
        let mut headers = reqwest::header::HeaderMap::new();
        assert_eq!(parse_retry_after(&headers), None);

        headers.insert(reqwest::header::RETRY_AFTER, "30".parse().unwrap());
        assert_eq!(parse_retry_after(&headers), Some(30));
    }
}
