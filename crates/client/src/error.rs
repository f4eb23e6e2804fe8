//! Typed error enum for the catalog client.

use thiserror::Error;

/// Coarse classification surfaced to the store and the views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection failure, timeout, or non-2xx status.
    Transport,
    /// The backend answered but reported an error or sent a malformed envelope.
    Backend,
}

/// Errors from catalog API operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("backend error: {0}")]
    Backend(String),
    #[error("unexpected envelope status: {0:?}")]
    UnknownStatus(String),
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}

impl CatalogError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::HttpRequest(_) | Self::HttpStatus { .. } | Self::ClientInit(_) | Self::InvalidUrl(_) => {
                ErrorKind::Transport
            },
            Self::Backend(_) | Self::UnknownStatus(_) | Self::JsonParse { .. } => ErrorKind::Backend,
        }
    }

    /// Whether a caller-side retry could plausibly succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::HttpRequest(e) => e.is_timeout() || e.is_connect(),
            Self::HttpStatus { code, .. } => matches!(code, 429 | 500 | 502 | 503 | 504),
            _ => false,
        }
    }

    /// Human-readable message for display: the backend's own text when it sent one.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Backend(message) => message.clone(),
            other => other.to_string(),
        }
    }
}
