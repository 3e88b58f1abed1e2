use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use ratatui::crossterm::{execute, terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::search::resolve::Lookup;
use crate::tui::state::TuiApp;

type TerminalType = Terminal<CrosstermBackend<Stdout>>;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const SPINNER_INTERVAL: Duration = Duration::from_millis(150);

impl TuiApp {
    pub fn run(&mut self) -> Result<()> {
        struct TuiGuard;
        impl Drop for TuiGuard {
            fn drop(&mut self) {
                let mut stdout = io::stdout();
                let _ = execute!(
                    stdout,
                    DisableMouseCapture,
                    terminal::LeaveAlternateScreen
                );
                let _ = terminal::disable_raw_mode();
            }
        }
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, terminal::EnterAlternateScreen, EnableMouseCapture)?;
        let _guard = TuiGuard;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.clear()?;
        info!("tui started");
        let res = self.event_loop(&mut terminal);
        self.shutdown();
        terminal.show_cursor()?;
        res
    }

    fn event_loop(&mut self, terminal: &mut TerminalType) -> Result<()> {
        let mut last_spinner_update = Instant::now();
        loop {
            let now = Instant::now();
            self.drain_inbox();
            self.tick(now);

            let animating = self.modal.is_open()
                && (self.search.results().is_loading() || self.has_pending_rows());
            if animating && last_spinner_update.elapsed() >= SPINNER_INTERVAL {
                self.spinner_state = self.spinner_state.wrapping_add(1);
                last_spinner_update = now;
                self.dirty = true;
            }

            if self.dirty {
                terminal.draw(|f| self.view(f))?;
                self.dirty = false;
            }

            if event::poll(POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(k) => {
                        self.handle_key(k, Instant::now());
                        self.dirty = true;
                    }
                    Event::Mouse(m) => {
                        self.handle_mouse(m);
                        self.dirty = true;
                    }
                    Event::Resize(w, h) => {
                        debug!(w, h, "resize");
                        self.dirty = true;
                    }
                    _ => {}
                }
            }

            if self.should_quit {
                info!(navigated = self.navigated.len(), "tui exiting");
                return Ok(());
            }
        }
    }

    fn has_pending_rows(&self) -> bool {
        let Some(items) = self.search.results().result() else {
            return false;
        };
        items
            .iter()
            .filter(|item| item.path.is_empty())
            .any(|item| matches!(self.resolver.get(&item.id), None | Some(Lookup::Pending)))
    }
}
