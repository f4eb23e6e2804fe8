//! Client configuration.

use std::time::Duration;

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, DEFAULT_RECENT_LIMIT, DEFAULT_REQUEST_TIMEOUT_SECS,
    MAX_PAGE_SIZE,
};
use crate::env_config::{env_parse_with_default, env_string, process_env};
use crate::{CoreError, Result};

pub const ENV_BASE_URL: &str = "FOLIO_BASE_URL";
pub const ENV_PAGE_SIZE: &str = "FOLIO_PAGE_SIZE";
pub const ENV_TIMEOUT_SECS: &str = "FOLIO_TIMEOUT_SECS";
pub const ENV_ORDER_BY: &str = "FOLIO_ORDER_BY";
pub const ENV_RECENT_LIMIT: &str = "FOLIO_RECENT_LIMIT";

/// Settings shared by the catalog client and the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base path, without trailing slash.
    pub base_url: String,
    /// Items per infinite-scroll page. Always > 0.
    pub page_size: usize,
    /// Deadline applied to every request.
    pub request_timeout: Duration,
    /// Sort key forwarded to the list endpoint (`orderBy`).
    pub order_by: Option<String>,
    pub recent_limit: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            order_by: None,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

impl ClientConfig {
    /// Reads the configuration from `FOLIO_*` environment variables.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidConfig`] if the resulting values fail validation.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(process_env)
    }

    /// Reads the configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidConfig`] if the resulting values fail validation.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let base_url = env_string(&lookup, ENV_BASE_URL).unwrap_or(defaults.base_url);
        let page_size = env_parse_with_default(&lookup, ENV_PAGE_SIZE, defaults.page_size);
        let timeout_secs =
            env_parse_with_default(&lookup, ENV_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS);
        let recent_limit =
            env_parse_with_default(&lookup, ENV_RECENT_LIMIT, defaults.recent_limit);
        let order_by = env_string(&lookup, ENV_ORDER_BY);

        Self {
            base_url,
            page_size,
            request_timeout: Duration::from_secs(timeout_secs),
            order_by,
            recent_limit,
        }
        .validated()
    }

    /// Normalizes the base URL and checks value ranges.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidConfig`] for an empty base URL, a zero or
    /// oversized page size, or a zero timeout.
    pub fn validated(mut self) -> Result<Self> {
        self.base_url = self.base_url.trim_end_matches('/').to_owned();
        if self.base_url.is_empty() {
            return Err(CoreError::InvalidConfig("base URL must not be empty".to_owned()));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(CoreError::InvalidConfig(format!(
                "page size must be in 1..={MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(CoreError::InvalidConfig("request timeout must be positive".to_owned()));
        }
        Ok(self)
    }
}
