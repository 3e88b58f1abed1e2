use std::collections::HashMap;
use tracing::{debug, warn};

use crate::api::{ApiError, DriveItem, SearchResultItem, item_request_key};
use crate::search::path::{decode_path, item_path, map_parent_path};

/// Cached outcome of one `/api/item` lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Pending,
    Resolved(String),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    Loading,
    Error,
    Ready,
}

/// Everything needed to draw one search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub title: String,
    pub description: String,
    /// Site path to navigate to; only set for ready rows.
    pub target: Option<String>,
    pub state: RowState,
    pub is_folder: bool,
}

impl ResultRow {
    pub fn is_navigable(&self) -> bool {
        self.state == RowState::Ready && self.target.is_some()
    }

    fn ready(item: &SearchResultItem, path: &str) -> Self {
        Self {
            title: item.name.clone(),
            description: decode_path(path),
            target: Some(path.to_string()),
            state: RowState::Ready,
            is_folder: item.is_folder(),
        }
    }
}

/// A lookup the caller should start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub key: String,
    pub id: String,
}

/// Per-item path resolution for hits the search response could not place.
/// Lookups are keyed by request path and never issued twice for a key while
/// the entry is cached.
#[derive(Debug, Clone, Default)]
pub struct ItemResolver {
    base_directory: String,
    cache: HashMap<String, Lookup>,
}

impl ItemResolver {
    pub fn new(base_directory: impl Into<String>) -> Self {
        Self {
            base_directory: base_directory.into(),
            cache: HashMap::new(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Lookup> {
        self.cache.get(&item_request_key(id))
    }

    /// Mark every unresolved, uncached hit as pending and return the lookups
    /// to start. Hits that already carry a path are skipped.
    pub fn request_missing(&mut self, items: &[SearchResultItem]) -> Vec<LookupRequest> {
        let mut out = Vec::new();
        for item in items.iter().filter(|i| i.path.is_empty()) {
            let key = item_request_key(&item.id);
            if self.cache.contains_key(&key) {
                continue;
            }
            debug!(key = %key, "queue item lookup");
            self.cache.insert(key.clone(), Lookup::Pending);
            out.push(LookupRequest {
                key,
                id: item.id.clone(),
            });
        }
        out
    }

    pub fn complete(&mut self, key: &str, result: Result<DriveItem, ApiError>) {
        let lookup = match result {
            Ok(item) => {
                debug!(
                    key,
                    id = %item.id,
                    folder = item.folder.is_some(),
                    size = ?item.size,
                    modified = ?item.last_modified,
                    "item resolved"
                );
                let parent = item.parent_reference.path().unwrap_or_default();
                let mapped = map_parent_path(parent, &self.base_directory);
                Lookup::Resolved(item_path(&mapped, &item.name))
            }
            Err(e) => {
                warn!(key, err = %e, "item lookup failed");
                Lookup::Failed(e.display_message())
            }
        };
        self.cache.insert(key.to_string(), lookup);
    }

    /// Drop failed lookups so they are retried next time they are needed.
    pub fn evict_failed(&mut self) {
        self.cache.retain(|_, v| !matches!(v, Lookup::Failed(_)));
    }

    pub fn row(&self, item: &SearchResultItem) -> ResultRow {
        if !item.path.is_empty() {
            return ResultRow::ready(item, &item.path);
        }
        match self.get(&item.id) {
            Some(Lookup::Resolved(path)) => ResultRow::ready(item, path),
            Some(Lookup::Failed(message)) => ResultRow {
                title: item.name.clone(),
                description: message.clone(),
                target: None,
                state: RowState::Error,
                is_folder: item.is_folder(),
            },
            Some(Lookup::Pending) | None => ResultRow {
                title: item.name.clone(),
                description: "Loading ...".to_string(),
                target: None,
                state: RowState::Loading,
                is_folder: item.is_folder(),
            },
        }
    }
}
