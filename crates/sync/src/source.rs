//! Remote catalog abstraction consumed by the store.

use async_trait::async_trait;
use folio_client::{CatalogClient, CatalogError, ImageQuery};
use folio_core::{FolderNode, ImageItem, ItemPatch};

/// Operations the store needs from the backend. Implemented by
/// [`CatalogClient`]; tests substitute in-process fakes.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Folder forest with own (non-aggregated) counts.
    async fn fetch_folders(&self) -> Result<Vec<FolderNode>, CatalogError>;

    /// One page of the image list.
    async fn fetch_images(&self, query: &ImageQuery) -> Result<Vec<ImageItem>, CatalogError>;

    /// Most recent items, optionally within one folder.
    async fn fetch_recent(
        &self,
        limit: usize,
        folder_id: Option<&str>,
    ) -> Result<Vec<ImageItem>, CatalogError>;

    /// Writes a metadata patch and returns it once acknowledged.
    async fn update_item(&self, patch: &ItemPatch) -> Result<ItemPatch, CatalogError>;
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch_folders(&self) -> Result<Vec<FolderNode>, CatalogError> {
        CatalogClient::fetch_folders(self).await
    }

    async fn fetch_images(&self, query: &ImageQuery) -> Result<Vec<ImageItem>, CatalogError> {
        CatalogClient::fetch_images(self, query).await
    }

    async fn fetch_recent(
        &self,
        limit: usize,
        folder_id: Option<&str>,
    ) -> Result<Vec<ImageItem>, CatalogError> {
        CatalogClient::fetch_recent(self, limit, folder_id).await
    }

    async fn update_item(&self, patch: &ItemPatch) -> Result<ItemPatch, CatalogError> {
        CatalogClient::update_item(self, patch).await
    }
}
