use std::time::{Duration, Instant};
use tracing::debug;

use crate::api::{ApiError, ParentReference, SearchResultItem};
use crate::search::debounce::Debouncer;
use crate::search::path::{item_path, map_parent_path};

/// Snapshot of an asynchronous operation.
#[derive(Debug, Clone, PartialEq)]
pub enum AsyncResult<T> {
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> AsyncResult<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, AsyncResult::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AsyncResult::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            AsyncResult::Ready(v) => Some(v),
            _ => None,
        }
    }
}

/// A search that is due to be sent. The generation is echoed back with the
/// response so stale answers can be told apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub generation: u64,
    pub query: String,
}

/// Fill in `path` for every hit that carries a parent path. Hits left with an
/// empty path must be resolved through the item endpoint.
pub fn ingest(items: Vec<SearchResultItem>, base_directory: &str) -> Vec<SearchResultItem> {
    items
        .into_iter()
        .map(|mut item| {
            item.path = match &item.parent_reference {
                ParentReference::WithPath(parent) => {
                    item_path(&map_parent_path(parent, base_directory), &item.name)
                }
                ParentReference::WithoutPath => String::new(),
            };
            item
        })
        .collect()
}

/// Query state plus the debounced, generation-checked result set.
#[derive(Debug, Clone)]
pub struct DebouncedSearch {
    query: String,
    generation: u64,
    debouncer: Debouncer,
    results: AsyncResult<Vec<SearchResultItem>>,
    base_directory: String,
}

impl DebouncedSearch {
    pub fn new(quiet: Duration, base_directory: impl Into<String>) -> Self {
        Self {
            query: String::new(),
            generation: 0,
            debouncer: Debouncer::new(quiet),
            results: AsyncResult::Ready(Vec::new()),
            base_directory: base_directory.into(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn results(&self) -> &AsyncResult<Vec<SearchResultItem>> {
        &self.results
    }

    pub fn set_query(&mut self, query: impl Into<String>, now: Instant) {
        self.query = query.into();
        self.generation += 1;
        if self.query.is_empty() {
            self.debouncer.disarm();
            self.results = AsyncResult::Ready(Vec::new());
        } else {
            self.debouncer.arm(now);
            self.results = AsyncResult::Loading;
        }
    }

    pub fn reset(&mut self) {
        self.set_query(String::new(), Instant::now());
    }

    pub fn poll_due(&mut self, now: Instant) -> Option<SearchTicket> {
        if !self.debouncer.fire(now) {
            return None;
        }
        debug!(generation = self.generation, query = %self.query, "search due");
        Some(SearchTicket {
            generation: self.generation,
            query: self.query.clone(),
        })
    }

    /// Apply a completed search. Responses for any generation but the current
    /// one are dropped.
    pub fn accept(
        &mut self,
        generation: u64,
        result: Result<Vec<SearchResultItem>, ApiError>,
    ) -> bool {
        if generation != self.generation {
            debug!(
                generation,
                current = self.generation,
                "dropping stale search response"
            );
            return false;
        }
        self.results = match result {
            Ok(items) => AsyncResult::Ready(ingest(items, &self.base_directory)),
            Err(e) => AsyncResult::Failed(e.display_message()),
        };
        true
    }
}
