use futures::future::join_all;
use std::sync::Arc;
use tracing::info;

use crate::api::{ApiError, DriveApi};
use crate::search::query::ingest;
use crate::search::resolve::{ItemResolver, RowState};

/// Run a single search without the TUI, resolve every hit and return one
/// printable line per row.
pub async fn search_once(
    api: Arc<dyn DriveApi>,
    query: &str,
    site_url: &str,
    base_directory: &str,
) -> Result<Vec<String>, ApiError> {
    if query.is_empty() {
        return Ok(Vec::new());
    }
    let items = ingest(api.search(query).await?, base_directory);
    info!(query, hits = items.len(), "search finished");

    let mut resolver = ItemResolver::new(base_directory);
    let requests = resolver.request_missing(&items);
    let results = join_all(requests.iter().map(|r| api.item(&r.id))).await;
    for (request, result) in requests.iter().zip(results) {
        resolver.complete(&request.key, result);
    }

    let site_url = site_url.trim_end_matches('/');
    Ok(items
        .iter()
        .map(|item| {
            let row = resolver.row(item);
            match (row.state, row.target) {
                (RowState::Ready, Some(target)) => {
                    format!("{}\t{}{}", row.description, site_url, target)
                }
                _ => format!("{}\t[error] {}", row.title, row.description),
            }
        })
        .collect())
}
