mod error;
pub mod types;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};

use crate::config::HttpConfig;
use crate::search::path::encode_component;

pub use error::ApiError;
pub use types::*;

/// Backend seam used by the search pipeline, so the UI and tests can run
/// against something other than a live index site.
#[async_trait]
pub trait DriveApi: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchResultItem>, ApiError>;
    async fn item(&self, id: &str) -> Result<DriveItem, ApiError>;
}

/// Cache key of the lookup for one item; identical to the request path.
pub fn item_request_key(id: &str) -> String {
    format!("/api/item?id={}", encode_component(id))
}

#[derive(Debug, Clone)]
pub struct DriveClient {
    pub site_url: String,
    pub(crate) inner: reqwest::Client,
    pub http_cfg: HttpConfig,
}

impl DriveClient {
    pub fn new(site_url: impl Into<String>) -> Result<Self, ApiError> {
        let inner = reqwest::Client::builder().build()?;
        Ok(Self {
            site_url: site_url.into(),
            inner,
            http_cfg: HttpConfig::default(),
        })
    }

    pub fn with_http_config(mut self, cfg: HttpConfig) -> Self {
        let builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(cfg.connect_timeout_ms))
            .timeout(Duration::from_millis(cfg.request_timeout_ms));
        // Keep the previous client if the builder rejects the settings.
        if let Ok(c) = builder.build() {
            self.inner = c;
        }
        self.http_cfg = cfg;
        self
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.site_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        debug!(endpoint=%url, ?query, timeout_ms = self.http_cfg.request_timeout_ms, "GET");
        let resp = self.inner.get(&url).query(query).send().await.map_err(|e| {
            error!(endpoint=%url, err=%e, "send error");
            ApiError::from(e)
        })?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            error!(endpoint=%url, status=%status.as_u16(), body=%text, "non-success status");
            return Err(ApiError::from_status(status, &text));
        }
        serde_json::from_str(&text).map_err(|e| {
            error!(endpoint=%url, err=%e, "deserialize error");
            ApiError::from(e)
        })
    }
}

#[async_trait]
impl DriveApi for DriveClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResultItem>, ApiError> {
        let items: Vec<SearchResultItem> = self.get_json("/api/search", &[("q", query)]).await?;
        debug!(query, hits = items.len(), "search response");
        Ok(items)
    }

    async fn item(&self, id: &str) -> Result<DriveItem, ApiError> {
        self.get_json("/api/item", &[("id", id)]).await
    }
}
