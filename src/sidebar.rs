use ratatui::layout::Rect;
use ratatui::prelude::Buffer;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

/// Width of the rail left on screen when the sidebar is collapsed.
pub const COLLAPSED_WIDTH: u16 = 3;

/// Collapsible sidebar hosting the explorer next to a content area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SidebarState {
    collapsed: bool,
    width: u16,
}

impl Default for SidebarState {
    fn default() -> Self {
        Self::new(32)
    }
}

impl SidebarState {
    pub const fn new(width: u16) -> Self {
        Self {
            collapsed: false,
            width,
        }
    }

    #[inline]
    pub const fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn set_width(&mut self, width: u16) {
        self.width = width;
    }

    pub const fn toggle(&mut self) {
        self.collapsed = !self.collapsed;
    }

    pub const fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }

    /// Splits `area` into `(sidebar, content)`.
    ///
    /// The sidebar never takes more than the whole area; when collapsed it shrinks to a
    /// rail of [`COLLAPSED_WIDTH`] columns.
    pub fn split(&self, area: Rect) -> (Rect, Rect) {
        let wanted = if self.collapsed {
            COLLAPSED_WIDTH
        } else {
            self.width
        };
        let width = wanted.min(area.width);
        let sidebar = Rect { width, ..area };
        let content = Rect {
            x: area.x + width,
            width: area.width - width,
            ..area
        };
        (sidebar, content)
    }
}

/// The strip drawn in place of a collapsed sidebar.
#[derive(Clone, Copy, Debug, Default)]
pub struct CollapsedRail {
    style: Style,
}

impl CollapsedRail {
    pub const fn new(style: Style) -> Self {
        Self { style }
    }
}

impl Widget for CollapsedRail {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new("»")
            .style(self.style)
            .block(Block::default().borders(Borders::RIGHT))
            .render(area, buf);
    }
}
