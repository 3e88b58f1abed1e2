pub mod debounce;
pub mod path;
pub mod query;
pub mod resolve;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::api::{ApiError, DriveApi, DriveItem, SearchResultItem};
use crate::search::query::SearchTicket;
use crate::search::resolve::LookupRequest;

/// Results posted back to the UI loop by background requests.
#[derive(Debug)]
pub enum AppEvent {
    SearchFinished {
        generation: u64,
        result: Result<Vec<SearchResultItem>, ApiError>,
    },
    ItemResolved {
        key: String,
        result: Result<DriveItem, ApiError>,
    },
}

/// Run a due search in the background. Superseded searches are not aborted;
/// the receiver discards them by generation.
pub fn spawn_search(
    api: Arc<dyn DriveApi>,
    ticket: SearchTicket,
    tx: UnboundedSender<AppEvent>,
    cancel: CancellationToken,
) {
    tokio::spawn(async move {
        info!(generation = ticket.generation, query = %ticket.query, "search");
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("search abandoned on shutdown");
                return;
            }
            res = api.search(&ticket.query) => res,
        };
        let _ = tx.send(AppEvent::SearchFinished {
            generation: ticket.generation,
            result,
        });
    });
}

pub fn spawn_lookup(
    api: Arc<dyn DriveApi>,
    request: LookupRequest,
    tx: UnboundedSender<AppEvent>,
    cancel: CancellationToken,
) {
    tokio::spawn(async move {
        debug!(key = %request.key, "item lookup");
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            res = api.item(&request.id) => res,
        };
        let _ = tx.send(AppEvent::ItemResolved {
            key: request.key,
            result,
        });
    });
}
