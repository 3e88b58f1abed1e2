use ratatui::layout::{Position, Rect};
use ratatui::widgets::ListState;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::DriveApi;
use crate::config::AppConfig;
use crate::search::query::DebouncedSearch;
use crate::search::resolve::{ItemResolver, ResultRow};
use crate::search::{AppEvent, spawn_lookup, spawn_search};
use crate::tui::modal::{CloseReason, Modal};
use crate::tui::theme::Theme;

/// Terminal rows used by one result entry (name + description).
pub const ROW_HEIGHT: u16 = 2;

pub struct TuiApp {
    pub title: String,
    pub site_url: String,
    pub modal: Modal,
    pub search: DebouncedSearch,
    pub resolver: ItemResolver,
    pub list_state: ListState,
    pub theme: Theme,
    /// Links picked during this session, oldest first.
    pub navigated: Vec<String>,
    pub dirty: bool,
    pub spinner_state: usize,
    pub should_quit: bool,
    pub(crate) modal_area: Option<Rect>,
    pub(crate) list_area: Option<Rect>,
    api: Arc<dyn DriveApi>,
    inbox_tx: UnboundedSender<AppEvent>,
    inbox_rx: UnboundedReceiver<AppEvent>,
    cancel: CancellationToken,
}

impl TuiApp {
    pub fn new(title: impl Into<String>, api: Arc<dyn DriveApi>, cfg: &AppConfig) -> Self {
        let (inbox_tx, inbox_rx) = unbounded_channel();
        Self {
            title: title.into(),
            site_url: cfg.site_url.trim_end_matches('/').to_string(),
            modal: Modal::default(),
            search: DebouncedSearch::new(
                Duration::from_millis(cfg.debounce_ms),
                cfg.base_directory.clone(),
            ),
            resolver: ItemResolver::new(cfg.base_directory.clone()),
            list_state: ListState::default(),
            theme: Theme::by_name(&cfg.theme),
            navigated: Vec::new(),
            dirty: true,
            spinner_state: 0,
            should_quit: false,
            modal_area: None,
            list_area: None,
            api,
            inbox_tx,
            inbox_rx,
            cancel: CancellationToken::new(),
        }
    }

    pub fn open_modal(&mut self) {
        if self.modal.open() {
            debug!("search dialog opened");
            self.dirty = true;
        }
    }

    /// Close the dialog and forget the current search so the next open
    /// starts from an empty input.
    pub fn close_modal(&mut self, reason: CloseReason) {
        if !self.modal.close(reason) {
            return;
        }
        self.search.reset();
        debug!(generation = self.search.generation(), "search reset");
        self.resolver.evict_failed();
        self.list_state = ListState::default();
        self.modal_area = None;
        self.list_area = None;
        self.dirty = true;
    }

    pub fn set_query(&mut self, query: impl Into<String>, now: Instant) {
        self.search.set_query(query, now);
        self.list_state.select(None);
        self.dirty = true;
    }

    pub fn push_char(&mut self, c: char, now: Instant) {
        let mut q = self.search.query().to_string();
        q.push(c);
        self.set_query(q, now);
    }

    pub fn pop_char(&mut self, now: Instant) {
        let mut q = self.search.query().to_string();
        if q.pop().is_some() {
            self.set_query(q, now);
        }
    }

    /// Start the search once its quiet period has elapsed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(ticket) = self.search.poll_due(now) {
            spawn_search(
                self.api.clone(),
                ticket,
                self.inbox_tx.clone(),
                self.cancel.clone(),
            );
        }
    }

    pub fn drain_inbox(&mut self) {
        while let Ok(event) = self.inbox_rx.try_recv() {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SearchFinished { generation, result } => {
                if !self.search.accept(generation, result) {
                    return;
                }
                if let Some(e) = self.search.results().error() {
                    warn!(generation, error = e, "search failed");
                }
                let lookups = match self.search.results().result() {
                    Some(items) => {
                        self.list_state
                            .select(if items.is_empty() { None } else { Some(0) });
                        self.resolver.request_missing(items)
                    }
                    None => Vec::new(),
                };
                for request in lookups {
                    spawn_lookup(
                        self.api.clone(),
                        request,
                        self.inbox_tx.clone(),
                        self.cancel.clone(),
                    );
                }
                self.dirty = true;
            }
            AppEvent::ItemResolved { key, result } => {
                self.resolver.complete(&key, result);
                self.dirty = true;
            }
        }
    }

    pub fn rows(&self) -> Vec<ResultRow> {
        self.search
            .results()
            .result()
            .map(|items| items.iter().map(|i| self.resolver.row(i)).collect())
            .unwrap_or_default()
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    /// Move the selection by `delta` rows, clamped to the list.
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.rows().len();
        if len == 0 {
            return;
        }
        let current = self.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1) as usize;
        self.list_state.select(Some(next));
        self.dirty = true;
    }

    /// Follow the row at `index` if it is ready. Returns the full URL.
    pub fn navigate(&mut self, index: usize) -> Option<String> {
        let row = self.rows().into_iter().nth(index)?;
        if !row.is_navigable() {
            return None;
        }
        let url = format!("{}{}", self.site_url, row.target?);
        info!(url = %url, "navigate");
        self.navigated.push(url.clone());
        Some(url)
    }

    /// Enter on the selected row: navigate, then close.
    pub fn activate_selected(&mut self) -> Option<String> {
        let url = self.navigate(self.selected()?)?;
        self.close_modal(CloseReason::RowClick);
        Some(url)
    }

    /// Mouse click at terminal cell (`x`, `y`). Any click in the results area
    /// closes the dialog, including the loading, error and empty messages.
    /// Clicks on a ready row navigate first.
    pub fn click(&mut self, x: u16, y: u16) {
        if !self.modal.is_open() {
            return;
        }
        let pos = Position::new(x, y);
        if let Some(list) = self.list_area {
            if list.contains(pos) {
                let has_rows = self
                    .search
                    .results()
                    .result()
                    .is_some_and(|items| !items.is_empty());
                if has_rows {
                    let index =
                        self.list_state.offset() + ((y - list.y) / ROW_HEIGHT) as usize;
                    self.navigate(index);
                }
                self.close_modal(CloseReason::RowClick);
                return;
            }
        }
        match self.modal_area {
            Some(area) if area.contains(pos) => {}
            _ => self.close_modal(CloseReason::Backdrop),
        }
    }

    pub fn last_navigated(&self) -> Option<&str> {
        self.navigated.last().map(String::as_str)
    }

    /// Abandon background requests.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}
