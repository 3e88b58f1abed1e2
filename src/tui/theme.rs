use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub header_style: Style,
    pub border_style: Style,
    pub input_style: Style,
    pub placeholder_style: Style,
    pub hint_style: Style,
    pub title_style: Style,
    pub folder_style: Style,
    pub description_style: Style,
    pub loading_style: Style,
    pub error_style: Style,
    pub selected_style: Style,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            header_style: Style::default().fg(Color::Cyan),
            border_style: Style::default().fg(Color::DarkGray),
            input_style: Style::default().fg(Color::White),
            placeholder_style: Style::default().fg(Color::DarkGray),
            hint_style: Style::default().fg(Color::Gray).add_modifier(Modifier::REVERSED),
            title_style: Style::default().fg(Color::White),
            folder_style: Style::default().fg(Color::LightBlue),
            description_style: Style::default().fg(Color::Gray),
            loading_style: Style::default().fg(Color::DarkGray),
            error_style: Style::default().fg(Color::Red),
            selected_style: Style::default().bg(Color::DarkGray).fg(Color::White),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            header_style: Style::default().fg(Color::Blue),
            border_style: Style::default().fg(Color::Gray),
            input_style: Style::default().fg(Color::Black),
            placeholder_style: Style::default().fg(Color::Gray),
            hint_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::REVERSED),
            title_style: Style::default().fg(Color::Black),
            folder_style: Style::default().fg(Color::Blue),
            description_style: Style::default().fg(Color::DarkGray),
            loading_style: Style::default().fg(Color::Gray),
            error_style: Style::default().fg(Color::Red),
            selected_style: Style::default().bg(Color::Gray).fg(Color::Black),
        }
    }

    /// Unknown names fall back to the dark theme.
    pub fn by_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }
}
