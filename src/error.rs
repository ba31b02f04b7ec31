//! Error types for ScanBrief
//!
//! Two layers live here. [`ErrorKind`] plus [`AnalysisError`] form the stable
//! taxonomy every adapter failure is reported through. [`ScanbriefError`] covers
//! the surrounding plumbing (config files, I/O, JSON) and uses `thiserror` for
//! the `Display` and `Error` implementations.

use std::fmt;
use thiserror::Error;

use crate::analysis::translate::{translate, ErrorContext};

// ============================================================================
// Analysis Error Taxonomy
// ============================================================================

/// Classification of every failure the analysis adapter can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Requested logical model key is not in the capability table
    UnsupportedModel,
    /// Analysis template lacks its `{data}` substitution point
    TemplateError,
    /// The provider family's credential is not configured
    MissingCredential,
    /// 401: credential rejected
    Unauthorized,
    /// 403: credential lacks permission
    Forbidden,
    /// 429: rate limit or quota exceeded
    RateLimited,
    /// 404: wire model name unknown to the provider
    ModelNotFound,
    /// 2xx response without exactly one generated message
    MalformedResponse,
    /// No response before the deadline
    Timeout,
    /// Any other provider-reported failure
    ProviderError,
    /// Connection-level failure before a response arrived
    NetworkError,
}

impl ErrorKind {
    /// Stable snake_case identifier, used in logs and JSON bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnsupportedModel => "unsupported_model",
            ErrorKind::TemplateError => "template_error",
            ErrorKind::MissingCredential => "missing_credential",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::ModelNotFound => "model_not_found",
            ErrorKind::MalformedResponse => "malformed_response",
            ErrorKind::Timeout => "timeout",
            ErrorKind::ProviderError => "provider_error",
            ErrorKind::NetworkError => "network_error",
        }
    }

    /// Returns `true` when the failure happened before anything was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ErrorKind::UnsupportedModel | ErrorKind::TemplateError | ErrorKind::MissingCredential
        )
    }

    /// HTTP status the gateway answers with for this kind.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::UnsupportedModel => 400,
            ErrorKind::TemplateError | ErrorKind::MissingCredential => 500,
            ErrorKind::Timeout => 504,
            ErrorKind::Unauthorized
            | ErrorKind::Forbidden
            | ErrorKind::RateLimited
            | ErrorKind::ModelNotFound
            | ErrorKind::MalformedResponse
            | ErrorKind::ProviderError
            | ErrorKind::NetworkError => 502,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified analysis failure.
///
/// `message` is the canonical user-facing text produced by the error
/// translator; `detail` keeps the provider's own wording (credential
/// redacted) for diagnostics.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct AnalysisError {
    pub kind: ErrorKind,
    pub message: String,
    pub detail: Option<String>,
    pub provider_status: Option<u16>,
}

impl AnalysisError {
    /// Build an error of `kind`, rendering its message from `ctx`.
    pub fn new(kind: ErrorKind, ctx: &ErrorContext<'_>) -> Self {
        Self {
            kind,
            message: translate(kind, ctx),
            detail: ctx.provider_message.map(str::to_string),
            provider_status: ctx.provider_status,
        }
    }
}

// ============================================================================
// Primary Error Type
// ============================================================================

/// Errors from the plumbing around the adapter.
#[derive(Error, Debug)]
pub enum ScanbriefError {
    /// Configuration-related errors (invalid config, unknown default model, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Classified adapter failure
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// Standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A specialized `Result` type for ScanBrief plumbing.
pub type Result<T> = std::result::Result<T, ScanbriefError>;
