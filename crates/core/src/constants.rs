//! Shared constants for folio.
//!
//! Defaults and reserved identifiers used by more than one crate.

/// Reserved id of the synthetic root folder (the unfiltered "all items" view).
pub const ALL_FOLDER_ID: &str = "all";

/// Display name of the synthetic root folder.
pub const ALL_FOLDER_NAME: &str = "All";

/// Default backend base path (the local media-library bridge).
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/eagle";

/// Default number of items requested per infinite-scroll page.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Default number of items returned by the recent-images endpoint.
pub const DEFAULT_RECENT_LIMIT: usize = 100;

/// Default per-request deadline in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Upper bound on page size accepted from configuration (DoS protection).
pub const MAX_PAGE_SIZE: usize = 1000;

/// Maximum number of body bytes quoted in error messages.
pub const MAX_ERROR_BODY_LEN: usize = 300;
