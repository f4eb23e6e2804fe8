use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;

use folio_core::constants::MAX_ERROR_BODY_LEN;
use folio_core::{ClientConfig, FolderNode, ImageItem, ItemPatch};

use crate::envelope::{decode_envelope, truncate};
use crate::error::CatalogError;
use crate::query::ImageQuery;

/// Client for the media-library backend.
///
/// One call is one round-trip; nothing is retried here.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: String,
}

impl CatalogClient {
    /// Creates a client for `config.base_url` with `config.request_timeout` as deadline.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(config: &ClientConfig) -> Result<Self, CatalogError> {
        Self::with_timeout(&config.base_url, config.request_timeout)
    }

    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::ClientInit(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /folders`. Node counts are own counts; aggregation is the caller's job.
    ///
    /// # Errors
    /// Transport failures, non-2xx statuses, and error or malformed envelopes.
    pub async fn fetch_folders(&self) -> Result<Vec<FolderNode>, CatalogError> {
        self.get("folders", &[], "folder list").await
    }

    /// `GET /list` for one infinite-scroll page.
    ///
    /// # Errors
    /// Transport failures, non-2xx statuses, and error or malformed envelopes.
    pub async fn fetch_images(&self, query: &ImageQuery) -> Result<Vec<ImageItem>, CatalogError> {
        self.get("list", &query.to_params(), "image page").await
    }

    /// `GET /recent`.
    ///
    /// # Errors
    /// Transport failures, non-2xx statuses, and error or malformed envelopes.
    pub async fn fetch_recent(
        &self,
        limit: usize,
        folder_id: Option<&str>,
    ) -> Result<Vec<ImageItem>, CatalogError> {
        let mut params = vec![("limit", limit.to_string())];
        if let Some(folder) = folder_id {
            params.push(("folder_id", folder.to_owned()));
        }
        self.get("recent", &params, "recent images").await
    }

    /// `POST /update`. Returns the applied patch once the backend acknowledges it.
    ///
    /// Not idempotent-safe to retry blindly: repeated patches are last-write-wins.
    ///
    /// # Errors
    /// Transport failures, non-2xx statuses, and error or malformed envelopes.
    pub async fn update_item(&self, patch: &ItemPatch) -> Result<ItemPatch, CatalogError> {
        let url = self.endpoint("update");
        tracing::debug!(id = %patch.id, "catalog update");
        let response = self.client.post(&url).json(patch).send().await?;
        let _ack: serde_json::Value = Self::read_envelope(response, "item update").await?;
        Ok(patch.clone())
    }

    /// URL of the thumbnail for item `id`.
    ///
    /// # Errors
    /// Returns [`CatalogError::InvalidUrl`] if the base URL does not parse.
    pub fn thumbnail_url(&self, id: &str) -> Result<String, CatalogError> {
        self.url_with_params("get_thumbnail_image", &[("id", id)])
    }

    /// URL of the original image for item `id`.
    ///
    /// # Errors
    /// Returns [`CatalogError::InvalidUrl`] if the base URL does not parse.
    pub fn image_url(&self, id: &str, ext: &str) -> Result<String, CatalogError> {
        self.url_with_params("get_image", &[("id", id), ("ext", ext)])
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn url_with_params(&self, path: &str, params: &[(&str, &str)]) -> Result<String, CatalogError> {
        Url::parse_with_params(&self.endpoint(path), params)
            .map(String::from)
            .map_err(|e| CatalogError::InvalidUrl(e.to_string()))
    }

    async fn get<T>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
        context: &str,
    ) -> Result<T, CatalogError>
    where
        T: DeserializeOwned + Default,
    {
        let url = self.endpoint(path);
        tracing::debug!(%url, ?params, "catalog request");
        let response = self.client.get(&url).query(params).send().await?;
        Self::read_envelope(response, context).await
    }

    async fn read_envelope<T>(response: reqwest::Response, context: &str) -> Result<T, CatalogError>
    where
        T: DeserializeOwned + Default,
    {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CatalogError::HttpStatus {
                code: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY_LEN).to_owned(),
            });
        }
        decode_envelope(&body, context)
    }
}
