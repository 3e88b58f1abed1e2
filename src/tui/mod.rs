pub mod event_handlers;
pub mod event_loop;
pub mod modal;
pub mod rendering;
pub mod state;
pub mod theme;

pub use state::TuiApp;
