use std::fmt;

use thiserror::Error;

/// Category of a failure reported by the remote vision API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Missing, invalid or revoked API key, or access denied (HTTP 401/403)
    AuthenticationFailed { details: String },
    /// Too many requests or exhausted quota (HTTP 429)
    RateLimited { details: String },
    /// The API rejected the request as malformed (HTTP 400/404/422)
    BadRequest { details: String },
    /// The provider failed on its side (HTTP 5xx)
    ServiceUnavailable { status: u16, details: String },
    /// The response was received but could not be used
    UnexpectedResponse { details: String },
}

impl ApiErrorKind {
    /// Map an HTTP status code and the body's error message to an error kind.
    pub fn from_status(status: u16, details: impl Into<String>) -> Self {
        let details = details.into();
        match status {
            401 | 403 => ApiErrorKind::AuthenticationFailed { details },
            429 => ApiErrorKind::RateLimited { details },
            400 | 404 | 422 => ApiErrorKind::BadRequest { details },
            500..=599 => ApiErrorKind::ServiceUnavailable { status, details },
            _ => ApiErrorKind::UnexpectedResponse {
                details: format!("HTTP {}: {}", status, details),
            },
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::AuthenticationFailed { details } => {
                write!(f, "authentication failed (check OPENAI_API_KEY)")?;
                with_details(f, details)
            }
            ApiErrorKind::RateLimited { details } => {
                write!(f, "rate limit exceeded")?;
                with_details(f, details)
            }
            ApiErrorKind::BadRequest { details } => write!(f, "bad request: {}", details),
            ApiErrorKind::ServiceUnavailable { status, details } => {
                write!(f, "service unavailable (HTTP {}): {}", status, details)
            }
            ApiErrorKind::UnexpectedResponse { details } => {
                write!(f, "unexpected response: {}", details)
            }
        }
    }
}

fn with_details(f: &mut fmt::Formatter<'_>, details: &str) -> fmt::Result {
    if details.is_empty() {
        Ok(())
    } else {
        write!(f, ": {}", details)
    }
}

/// Error types for the fridgelens library.
///
/// The analyzer never returns these directly: dispatch failures are folded into
/// a failure [`AnalysisResult`](crate::AnalysisResult). They surface from the
/// encoder, from client construction and from opt-in report parsing.
///
/// # Examples
///
/// ```
/// use fridgelens::{ApiErrorKind, FridgeLensError};
///
/// let kind = ApiErrorKind::from_status(401, "Incorrect API key provided");
/// let err = FridgeLensError::api_error("OpenAI", kind);
/// assert!(err.to_string().contains("authentication failed"));
/// assert!(err.to_string().ends_with("Incorrect API key provided"));
/// ```
#[derive(Error, Debug)]
pub enum FridgeLensError {
    /// Error reported by (or about) the remote API
    #[error("{provider} API error: {kind}")]
    ApiError {
        provider: String,
        kind: ApiErrorKind,
    },

    /// Model output did not match the requested report shape
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A data URI could not be built or parsed
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// Operation timed out
    #[error("Timeout error")]
    Timeout,

    /// HTTP client error (from reqwest)
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error (from serde_json)
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FridgeLensError {
    pub fn api_error(provider: impl Into<String>, kind: ApiErrorKind) -> Self {
        FridgeLensError::ApiError {
            provider: provider.into(),
            kind,
        }
    }

    /// The API error kind, if this is an API error.
    pub fn api_kind(&self) -> Option<&ApiErrorKind> {
        match self {
            FridgeLensError::ApiError { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

// reqwest::Error, serde_json::Error and io::Error don't implement PartialEq,
// so those variants never compare equal.
impl PartialEq for FridgeLensError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::ApiError {
                    provider: pa,
                    kind: ka,
                },
                Self::ApiError {
                    provider: pb,
                    kind: kb,
                },
            ) => pa == pb && ka == kb,
            (Self::ValidationError(a), Self::ValidationError(b)) => a == b,
            (Self::EncodingError(a), Self::EncodingError(b)) => a == b,
            (Self::Timeout, Self::Timeout) => true,
            _ => false,
        }
    }
}

/// A specialized Result type for fridgelens operations.
pub type Result<T> = std::result::Result<T, FridgeLensError>;
