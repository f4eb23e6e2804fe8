//! Application context: the one place the client and store are constructed.

use std::sync::Arc;

use folio_client::CatalogClient;
use folio_core::ClientConfig;

use crate::error::SyncError;
use crate::store::CatalogStore;

/// Created once at start-up and handed to every consumer; dropping it tears
/// the store and its HTTP connection pool down.
pub struct FolioContext {
    config: ClientConfig,
    store: CatalogStore<CatalogClient>,
}

impl FolioContext {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, SyncError> {
        let client = Arc::new(CatalogClient::new(&config)?);
        let store = CatalogStore::new(client, &config);
        tracing::debug!(base_url = %config.base_url, page_size = config.page_size, "context created");
        Ok(Self { config, store })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn client(&self) -> &CatalogClient {
        self.store.source()
    }

    pub fn store(&self) -> &CatalogStore<CatalogClient> {
        &self.store
    }
}
