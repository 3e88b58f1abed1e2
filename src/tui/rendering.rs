use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::search::query::AsyncResult;
use crate::search::resolve::{ResultRow, RowState};
use crate::tui::state::TuiApp;
use crate::tui::theme::Theme;

const PLACEHOLDER: &str = "Search ...";
const ESC_HINT: &str = " ESC ";
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Trim `s` to at most `max` display columns.
pub fn truncate_display(s: &str, max: usize) -> String {
    use unicode_width::UnicodeWidthChar;
    let mut width = 0usize;
    let mut out = String::new();
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > max {
            break;
        }
        out.push(ch);
        width += w;
    }
    out
}

/// Keep the last `max` display columns of `s`, so the end being typed stays
/// visible.
pub fn truncate_display_tail(s: &str, max: usize) -> String {
    use unicode_width::UnicodeWidthChar;
    let mut width = 0usize;
    let mut start = s.len();
    for (i, ch) in s.char_indices().rev() {
        let w = ch.width().unwrap_or(0);
        if width + w > max {
            break;
        }
        width += w;
        start = i;
    }
    s[start..].to_string()
}

impl TuiApp {
    pub fn view(&mut self, f: &mut Frame) {
        let size = f.area();
        self.render_background(f, size);
        if self.modal.is_open() {
            self.render_modal(f, size);
        }
    }

    fn render_background(&self, f: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(Span::styled(self.title.clone(), self.theme.header_style)),
            Line::from(Span::styled(
                "─".repeat(area.width as usize),
                self.theme.border_style,
            )),
            Line::from(format!("Site: {}  Theme: {}", self.site_url, self.theme.name)),
            Line::from("Press / or Ctrl+K to search, q to quit."),
        ];
        if let Some(url) = self.last_navigated() {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::raw("Last opened: "),
                Span::styled(url.to_string(), self.theme.folder_style),
            ]));
        }
        f.render_widget(Paragraph::new(lines), area);
    }

    fn render_modal(&mut self, f: &mut Frame, area: Rect) {
        let popup = centered_rect(80, 70, area);
        self.modal_area = Some(popup);
        f.render_widget(Clear, popup);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style)
            .title(" Search ");
        let inner = block.inner(popup);
        f.render_widget(block, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // input
                Constraint::Length(1), // separator
                Constraint::Min(1),    // results
            ])
            .split(inner);

        self.render_input(f, chunks[0]);
        f.render_widget(
            Paragraph::new("─".repeat(inner.width as usize)).style(self.theme.border_style),
            chunks[1],
        );
        self.render_results(f, chunks[2]);
    }

    fn render_input(&self, f: &mut Frame, area: Rect) {
        let hint_width = ESC_HINT.width() as u16;
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(hint_width)])
            .split(area);

        let query = self.search.query();
        let visible = truncate_display_tail(query, cols[0].width.saturating_sub(3) as usize);
        let input = if query.is_empty() {
            Span::styled(PLACEHOLDER, self.theme.placeholder_style)
        } else {
            Span::styled(visible.clone(), self.theme.input_style)
        };
        f.render_widget(Paragraph::new(Line::from(vec![Span::raw("> "), input])), cols[0]);
        f.render_widget(
            Paragraph::new(ESC_HINT).style(self.theme.hint_style),
            cols[1],
        );

        let cursor_x = cols[0].x + 2 + visible.width() as u16;
        f.set_cursor_position(Position::new(
            cursor_x.min(cols[0].right().saturating_sub(1)),
            area.y,
        ));
    }

    fn render_results(&mut self, f: &mut Frame, area: Rect) {
        self.list_area = Some(area);
        let spinner = SPINNER[self.spinner_state % SPINNER.len()];
        match self.search.results() {
            AsyncResult::Loading => {
                let p = Paragraph::new(format!("{spinner} Loading ..."))
                    .style(self.theme.loading_style);
                f.render_widget(p, area);
            }
            AsyncResult::Failed(message) => {
                let p = Paragraph::new(format!("Error: {message}")).style(self.theme.error_style);
                f.render_widget(p, area);
            }
            AsyncResult::Ready(items) if items.is_empty() => {
                let p = Paragraph::new("No results").style(self.theme.description_style);
                f.render_widget(p, area);
            }
            AsyncResult::Ready(_) => {
                let rows = self.rows();
                let width = area.width.saturating_sub(2) as usize;
                let pulse = self.spinner_state % 2 == 0;
                let items: Vec<ListItem> = rows
                    .iter()
                    .map(|row| row_item(row, &self.theme, width, pulse))
                    .collect();
                let list = List::new(items)
                    .highlight_style(self.theme.selected_style)
                    .highlight_symbol("> ");
                f.render_stateful_widget(list, area, &mut self.list_state);
            }
        }
    }
}

fn row_item<'a>(row: &ResultRow, theme: &Theme, width: usize, pulse: bool) -> ListItem<'a> {
    let (icon, title_style) = if row.is_folder {
        ("[dir] ", theme.folder_style)
    } else {
        ("", theme.title_style)
    };
    let title = Line::from(vec![
        Span::styled(icon, theme.description_style),
        Span::styled(truncate_display(&row.title, width), title_style),
    ]);
    let description_style = match row.state {
        RowState::Ready => theme.description_style,
        RowState::Error => theme.error_style,
        RowState::Loading if pulse => theme.loading_style.add_modifier(Modifier::DIM),
        RowState::Loading => theme.loading_style,
    };
    let description = Line::from(Span::styled(
        truncate_display(&row.description, width),
        description_style,
    ));
    ListItem::new(vec![title, description])
}

/// helper function to create a centered rect using up certain percentage of the available rect `r`
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, ParentReference, SearchResultItem};
    use crate::config::AppConfig;
    use crate::search::AppEvent;
    use crate::search::test_support::MockApi;
    use ratatui::{Terminal, backend::TestBackend};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn app() -> TuiApp {
        TuiApp::new("dsearch", Arc::new(MockApi::default()), &AppConfig::default())
    }

    fn screen(app: &mut TuiApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| app.view(f)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn hit(id: &str, name: &str, parent: Option<&str>) -> SearchResultItem {
        SearchResultItem {
            id: id.into(),
            name: name.into(),
            folder: None,
            parent_reference: parent
                .map(|p| ParentReference::WithPath(p.into()))
                .unwrap_or_default(),
            path: String::new(),
        }
    }

    fn finish(app: &mut TuiApp, result: Result<Vec<SearchResultItem>, ApiError>) {
        let generation = app.search.generation();
        app.handle_event(AppEvent::SearchFinished { generation, result });
    }

    #[test]
    fn truncate_respects_wide_chars() {
        assert_eq!(truncate_display("写真フォルダ", 5), "写真");
        assert_eq!(truncate_display("abc", 10), "abc");
        assert_eq!(truncate_display("abc", 0), "");
    }

    #[test]
    fn tail_truncation_keeps_the_end() {
        assert_eq!(truncate_display_tail("abcdef", 3), "def");
        assert_eq!(truncate_display_tail("写真フォルダ", 5), "ルダ");
        assert_eq!(truncate_display_tail("abc", 10), "abc");
        assert_eq!(truncate_display_tail("abc", 0), "");
    }

    #[test]
    fn long_query_shows_what_is_being_typed() {
        let mut app = app();
        app.open_modal();
        let query = format!("{}TAILEND", "x".repeat(120));
        app.set_query(query, Instant::now());
        let s = screen(&mut app);
        assert!(s.contains("TAILEND"));
    }

    #[test]
    fn click_on_empty_results_closes_dialog() {
        let mut app = app();
        app.open_modal();
        app.set_query("zzz", Instant::now());
        finish(&mut app, Ok(vec![]));
        let s = screen(&mut app);
        assert!(s.contains("No results"));

        let area = app.list_area.unwrap();
        app.click(area.x + 3, area.y);
        assert!(!app.modal.is_open());
        assert!(app.navigated.is_empty());
    }

    #[test]
    fn click_on_error_message_closes_dialog() {
        let mut app = app();
        app.open_modal();
        app.set_query("q", Instant::now());
        finish(
            &mut app,
            Err(ApiError::Status {
                status: reqwest::StatusCode::BAD_GATEWAY,
                message: "upstream down".into(),
            }),
        );
        screen(&mut app);
        let area = app.list_area.unwrap();
        app.click(area.x + 1, area.y);
        assert!(!app.modal.is_open());
    }

    #[test]
    fn closed_screen_has_no_dialog() {
        let mut app = app();
        let s = screen(&mut app);
        assert!(s.contains("Press / or Ctrl+K"));
        assert!(!s.contains("Search ..."));
    }

    #[test]
    fn open_dialog_shows_placeholder_and_esc() {
        let mut app = app();
        app.open_modal();
        let s = screen(&mut app);
        assert!(s.contains("Search ..."));
        assert!(s.contains("ESC"));
        assert!(s.contains("No results"));
        assert!(app.modal_area.is_some());
    }

    #[test]
    fn loading_and_error_states() {
        let mut app = app();
        app.open_modal();
        app.set_query("q", Instant::now());
        assert!(screen(&mut app).contains("Loading ..."));

        finish(
            &mut app,
            Err(ApiError::Status {
                status: reqwest::StatusCode::BAD_GATEWAY,
                message: "upstream down".into(),
            }),
        );
        assert!(screen(&mut app).contains("Error: upstream down"));
    }

    #[tokio::test]
    async fn rows_show_decoded_path_or_loading() {
        let mut app = app();
        app.open_modal();
        let t0 = Instant::now();
        app.set_query("n", t0);
        let _ = app.search.poll_due(t0 + Duration::from_secs(1));
        finish(
            &mut app,
            Ok(vec![
                hit("1", "notes#1.md", Some("/drive/root:/My Notes")),
                hit("2", "pending.md", None),
            ]),
        );
        let s = screen(&mut app);
        assert!(s.contains("notes#1.md"));
        assert!(s.contains("/My Notes/notes#1.md"));
        assert!(s.contains("pending.md"));
        assert!(s.contains("Loading ..."));
        assert!(app.list_area.is_some());
    }
}
