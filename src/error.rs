use serde_json::Value;
use thiserror::Error;

/// Maximum characters of response body included in error messages.
pub(crate) const MAX_ERROR_BODY_CHARS: usize = 200;

/// Errors that can occur when calling the Adaptive APIs.
#[derive(Debug, Error)]
pub enum AdaptiveError {
    /// HTTP/network layer error from reqwest.
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid or incomplete client configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A payload failed an operation's required-field check, or the
    /// operation name is not registered.
    #[error("validation error: {0}")]
    Validation(String),

    /// Signature computation error.
    #[error("signature error: {0}")]
    Signature(String),

    /// The provider answered outside the 2xx range.
    #[error("HTTP {status} with body: {}", preview(.body))]
    HttpStatus {
        status: u16,
        /// Parsed response body, or the raw text when parsing failed.
        body: Value,
    },

    /// The response body could not be parsed in the configured format.
    #[error("malformed response (HTTP {status}): {}", truncate_str(.body, MAX_ERROR_BODY_CHARS))]
    MalformedResponse { status: u16, body: String },

    /// The provider reported a non-success acknowledgement.
    #[error("response ack is {ack} (HTTP {status})")]
    Ack {
        ack: String,
        status: u16,
        /// Full response body, for provider-specific diagnostics.
        body: Value,
    },
}

impl AdaptiveError {
    /// Returns the HTTP status code if the exchange got that far.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AdaptiveError::HttpStatus { status, .. }
            | AdaptiveError::MalformedResponse { status, .. }
            | AdaptiveError::Ack { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the provider's response body, unmodified.
    pub fn response_body(&self) -> Option<&Value> {
        match self {
            AdaptiveError::HttpStatus { body, .. } | AdaptiveError::Ack { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Returns the raw response text for malformed-response errors.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            AdaptiveError::MalformedResponse { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Returns the acknowledgement value for ack errors.
    pub fn ack_value(&self) -> Option<&str> {
        match self {
            AdaptiveError::Ack { ack, .. } => Some(ack),
            _ => None,
        }
    }
}

/// A specialized Result type for Adaptive API operations.
pub type Result<T> = std::result::Result<T, AdaptiveError>;

/// Truncates a string to at most `max_chars` characters on a valid UTF-8 boundary.
pub(crate) fn truncate_str(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn preview(body: &Value) -> String {
    let rendered = body.to_string();
    truncate_str(&rendered, MAX_ERROR_BODY_CHARS).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn http_status_display_includes_body() {
        let err = AdaptiveError::HttpStatus {
            status: 500,
            body: json!({"error": "Internal Error"}),
        };
        let msg = err.to_string();
        assert!(msg.contains("HTTP 500"));
        assert!(msg.contains("Internal Error"));
    }

    #[test]
    fn ack_display() {
        let err = AdaptiveError::Ack {
            ack: "Failure".to_string(),
            status: 200,
            body: json!({}),
        };
        assert_eq!(err.to_string(), "response ack is Failure (HTTP 200)");
    }

    #[test]
    fn malformed_display_truncates_body() {
        let err = AdaptiveError::MalformedResponse {
            status: 200,
            body: "x".repeat(500),
        };
        let msg = err.to_string();
        assert!(msg.len() < 300);
        assert!(msg.contains("malformed response (HTTP 200)"));
    }

    #[test]
    fn validation_display() {
        let err = AdaptiveError::Validation("payKey is required".to_string());
        assert_eq!(err.to_string(), "validation error: payKey is required");
    }

    #[test]
    fn status_code_accessor() {
        let err = AdaptiveError::Ack {
            ack: "Failure".to_string(),
            status: 200,
            body: json!({}),
        };
        assert_eq!(err.status_code(), Some(200));
        assert_eq!(AdaptiveError::Config("x".into()).status_code(), None);
    }

    #[test]
    fn response_body_accessor() {
        let body = json!({"error": [{"errorId": "580022"}]});
        let err = AdaptiveError::HttpStatus {
            status: 400,
            body: body.clone(),
        };
        assert_eq!(err.response_body(), Some(&body));
        assert!(AdaptiveError::Validation("x".into()).response_body().is_none());
    }

    #[test]
    fn ack_value_accessor() {
        let err = AdaptiveError::Ack {
            ack: "PartialSuccess".to_string(),
            status: 200,
            body: json!({}),
        };
        assert_eq!(err.ack_value(), Some("PartialSuccess"));
        assert!(AdaptiveError::Config("x".into()).ack_value().is_none());
    }

    #[test]
    fn truncate_str_short() {
        assert_eq!(truncate_str("hello", 10), "hello");
    }

    #[test]
    fn truncate_str_long() {
        assert_eq!(truncate_str("hello world", 5), "hello");
    }

    #[test]
    fn truncate_str_multibyte() {
        let s = "中文测试数据";
        assert_eq!(truncate_str(s, 4), "中文测试");
    }
}
