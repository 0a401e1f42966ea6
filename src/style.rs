use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Borders;

/// Scroll policy applied when the selected row changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollPolicy {
    KeepInView,
    CenterOnSelect,
}

/// Visual settings of the explorer widget.
#[derive(Clone)]
pub struct ExplorerStyle<'a> {
    pub title: Option<Line<'a>>,
    pub block_style: Style,
    pub border_style: Style,
    pub highlight_style: Style,
    pub folder_style: Style,
    pub file_style: Style,
    pub line_style: Style,
    /// Style of the inline name field.
    pub edit_style: Style,
    /// Style of the character under the edit cursor.
    pub cursor_style: Style,
    pub status_style: Style,
    pub notice_style: Style,
    pub highlight_symbol: &'a str,
    pub borders: Borders,
    pub show_status: bool,
    pub scroll_policy: ScrollPolicy,
}

impl Default for ExplorerStyle<'_> {
    fn default() -> Self {
        Self {
            title: Some(Line::from("Files")),
            block_style: Style::default(),
            border_style: Style::default(),
            highlight_style: Style::default().add_modifier(Modifier::REVERSED),
            folder_style: Style::default().add_modifier(Modifier::BOLD),
            file_style: Style::default(),
            line_style: Style::default(),
            edit_style: Style::default().add_modifier(Modifier::UNDERLINED),
            cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            status_style: Style::default().add_modifier(Modifier::DIM),
            notice_style: Style::default(),
            highlight_symbol: "> ",
            borders: Borders::ALL,
            show_status: true,
            scroll_policy: ScrollPolicy::KeepInView,
        }
    }
}
