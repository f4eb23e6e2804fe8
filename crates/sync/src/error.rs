//! Typed error enum for the sync layer.

use std::sync::Arc;

use folio_client::{CatalogError, ErrorKind};
use thiserror::Error;

/// Store-level error. The catalog failure is shared behind an `Arc` because
/// one single-flight outcome is handed to every waiter.
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// Remote call failed (transport or backend).
    #[error("catalog: {0}")]
    Catalog(#[from] Arc<CatalogError>),

    /// Caller provided invalid input (empty patch, blank id).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl SyncError {
    #[must_use]
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Catalog(e) => Some(e.kind()),
            Self::InvalidInput(_) => None,
        }
    }

    /// Message recorded in the store for display.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Catalog(e) => e.message(),
            Self::InvalidInput(m) => m.clone(),
        }
    }
}

impl From<CatalogError> for SyncError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(Arc::new(err))
    }
}
