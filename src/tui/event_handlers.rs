use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use std::time::Instant;

use crate::tui::modal::CloseReason;
use crate::tui::state::TuiApp;

const PAGE: isize = 5;

impl TuiApp {
    pub fn handle_key(&mut self, k: KeyEvent, now: Instant) {
        if k.kind == KeyEventKind::Release {
            return;
        }
        let ctrl = k.modifiers.contains(KeyModifiers::CONTROL);
        // Handle Ctrl+C before generic Char(c) to avoid being shadowed
        if ctrl && k.code == KeyCode::Char('c') {
            self.close_modal(CloseReason::Programmatic);
            self.should_quit = true;
            return;
        }
        if self.modal.is_open() {
            self.handle_modal_key(k, ctrl, now);
        } else {
            self.handle_closed_key(k, ctrl);
        }
    }

    fn handle_closed_key(&mut self, k: KeyEvent, ctrl: bool) {
        match k.code {
            KeyCode::Char('k') if ctrl => self.open_modal(),
            KeyCode::Char('/') => self.open_modal(),
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_modal_key(&mut self, k: KeyEvent, ctrl: bool, now: Instant) {
        match k.code {
            KeyCode::Esc => self.close_modal(CloseReason::Escape),
            KeyCode::Enter => {
                self.activate_selected();
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-PAGE),
            KeyCode::PageDown => self.move_selection(PAGE),
            KeyCode::Char('p') if ctrl => self.move_selection(-1),
            KeyCode::Char('n') if ctrl => self.move_selection(1),
            KeyCode::Char('u') if ctrl => self.set_query(String::new(), now),
            KeyCode::Char(_) if ctrl => {}
            KeyCode::Char(c) => self.push_char(c, now),
            KeyCode::Backspace => self.pop_char(now),
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, m: MouseEvent) {
        match m.kind {
            MouseEventKind::Down(MouseButton::Left) => self.click(m.column, m.row),
            MouseEventKind::ScrollUp if self.modal.is_open() => self.move_selection(-1),
            MouseEventKind::ScrollDown if self.modal.is_open() => self.move_selection(1),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::search::test_support::MockApi;
    use ratatui::crossterm::event::KeyEventState;
    use std::sync::Arc;

    fn app() -> TuiApp {
        TuiApp::new("t", Arc::new(MockApi::default()), &AppConfig::default())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn slash_opens_and_escape_closes() {
        let mut app = app();
        let now = Instant::now();
        app.handle_key(key(KeyCode::Char('/')), now);
        assert!(app.modal.is_open());
        app.handle_key(key(KeyCode::Char('a')), now);
        app.handle_key(key(KeyCode::Char('b')), now);
        assert_eq!(app.search.query(), "ab");
        app.handle_key(key(KeyCode::Esc), now);
        assert!(!app.modal.is_open());
        assert!(!app.should_quit);

        app.handle_key(ctrl('k'), now);
        assert!(app.modal.is_open());
        assert_eq!(app.search.query(), "");
    }

    #[test]
    fn editing_keys() {
        let mut app = app();
        let now = Instant::now();
        app.open_modal();
        for c in "docs".chars() {
            app.handle_key(key(KeyCode::Char(c)), now);
        }
        app.handle_key(key(KeyCode::Backspace), now);
        assert_eq!(app.search.query(), "doc");
        app.handle_key(ctrl('u'), now);
        assert_eq!(app.search.query(), "");
        app.handle_key(ctrl('x'), now);
        assert_eq!(app.search.query(), "");
    }

    #[test]
    fn q_types_while_open_and_quits_while_closed() {
        let mut app = app();
        let now = Instant::now();
        app.open_modal();
        app.handle_key(key(KeyCode::Char('q')), now);
        assert_eq!(app.search.query(), "q");
        assert!(!app.should_quit);
        app.handle_key(key(KeyCode::Esc), now);
        app.handle_key(key(KeyCode::Char('q')), now);
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_c_quits_from_dialog() {
        let mut app = app();
        app.open_modal();
        app.handle_key(ctrl('c'), Instant::now());
        assert!(app.should_quit);
        assert!(!app.modal.is_open());
    }

    #[test]
    fn key_release_is_ignored() {
        let mut app = app();
        let release = KeyEvent {
            code: KeyCode::Char('/'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        app.handle_key(release, Instant::now());
        assert!(!app.modal.is_open());
    }

    #[test]
    fn backdrop_click_closes() {
        let mut app = app();
        app.open_modal();
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert!(!app.modal.is_open());
    }
}
