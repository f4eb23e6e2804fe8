use std::result::Result as StdResult;

use thiserror::Error;

/// Errors raised by folio-core (configuration validation).
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = StdResult<T, CoreError>;
