use tracing::debug;

/// Visibility of the search dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Escape,
    Backdrop,
    RowClick,
    Programmatic,
}

#[derive(Debug, Clone, Default)]
pub struct Modal {
    state: ModalState,
}

impl Modal {
    pub fn is_open(&self) -> bool {
        self.state == ModalState::Open
    }

    /// Returns true if the dialog was closed before.
    pub fn open(&mut self) -> bool {
        let changed = self.state == ModalState::Closed;
        self.state = ModalState::Open;
        changed
    }

    /// Returns true if the dialog was open before. Callers reset the query on
    /// every effective close.
    pub fn close(&mut self, reason: CloseReason) -> bool {
        let changed = self.state == ModalState::Open;
        if changed {
            debug!(?reason, "search dialog closed");
        }
        self.state = ModalState::Closed;
        changed
    }
}
