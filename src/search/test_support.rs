use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::api::{ApiError, DriveApi, DriveItem, SearchResultItem};

/// In-memory backend that records every call.
#[derive(Default)]
pub struct MockApi {
    pub hits: Vec<SearchResultItem>,
    pub items: HashMap<String, DriveItem>,
    pub fail_search: Option<String>,
    pub searches: Mutex<Vec<String>>,
    pub lookups: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn search_calls(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }

    pub fn lookup_calls(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl DriveApi for MockApi {
    async fn search(&self, query: &str) -> Result<Vec<SearchResultItem>, ApiError> {
        self.searches.lock().unwrap().push(query.to_string());
        match &self.fail_search {
            Some(msg) => Err(ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: msg.clone(),
            }),
            None => Ok(self.hits.clone()),
        }
    }

    async fn item(&self, id: &str) -> Result<DriveItem, ApiError> {
        self.lookups.lock().unwrap().push(id.to_string());
        self.items.get(id).cloned().ok_or_else(|| {
            ApiError::from_status(
                StatusCode::NOT_FOUND,
                r#"{"status":404,"message":"itemNotFound"}"#,
            )
        })
    }
}
