use ratatui::layout::{Constraint, Rect};
use ratatui::prelude::Buffer;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, HighlightSpacing, Paragraph, Row, Scrollbar,
    ScrollbarOrientation, ScrollbarState, StatefulWidget, Table, TableState, Widget, Wrap,
};

use crate::context::RowContext;
use crate::glyphs::{ExplorerGlyphs, edit_spans, label_line, name_spans};
use crate::state::{ExplorerState, RowGeometry};
use crate::style::ExplorerStyle;

/// Explorer panel: the tree table, a status line, and the blocking notice popup.
pub struct ExplorerView<'a> {
    style: ExplorerStyle<'a>,
    glyphs: ExplorerGlyphs<'a>,
}

impl Default for ExplorerView<'_> {
    fn default() -> Self {
        Self::new(ExplorerStyle::default())
    }
}

impl<'a> ExplorerView<'a> {
    pub const fn new(style: ExplorerStyle<'a>) -> Self {
        Self {
            style,
            glyphs: ExplorerGlyphs::unicode(),
        }
    }

    pub const fn glyphs(mut self, glyphs: ExplorerGlyphs<'a>) -> Self {
        self.glyphs = glyphs;
        self
    }

    /// Builds the table rows and, per row, the icon's column span (after `inset`).
    #[inline]
    fn build_rows<'s>(
        &'s self,
        state: &'s ExplorerState,
        inset: u16,
    ) -> (Vec<Row<'s>>, Vec<(u16, u16)>) {
        let editing = state.edit_session();
        let mut rows = Vec::with_capacity(state.visible_nodes().len());
        let mut icons = Vec::with_capacity(state.visible_nodes().len());
        for visible in state.visible_nodes() {
            let node = visible.node();
            let name_style = if node.is_folder() {
                self.style.folder_style
            } else {
                self.style.file_style
            };
            let ctx = RowContext {
                level: visible.depth(),
                is_tail_stack: visible.is_tail_stack.as_slice(),
                kind: node.kind(),
                is_open: node.is_open(),
                draw_lines: state.draw_lines(),
                line_style: self.style.line_style,
                name_style,
            };
            let name = match editing {
                Some(session) if session.id() == node.id() => {
                    edit_spans(session, self.style.edit_style, self.style.cursor_style)
                }
                _ => name_spans(node.name(), name_style),
            };
            let name_len = name.len();
            let line = label_line(&ctx, name, &self.glyphs);
            // Layout is `prefix.. icon " " name..`.
            let icon_idx = line.spans.len() - name_len - 2;
            let start: usize = line.spans[..icon_idx].iter().map(Span::width).sum();
            icons.push((
                inset.saturating_add(to_u16(start)),
                to_u16(line.spans[icon_idx].width()),
            ));
            rows.push(Row::new([Cell::from(line)]));
        }
        (rows, icons)
    }

    #[inline]
    fn render_scrollbar(
        area: Rect,
        buf: &mut Buffer,
        offset: usize,
        inner_height: usize,
        scroll_rows: usize,
    ) {
        let scroll_len = scroll_rows.saturating_add(1);
        let mut scrollbar_state = ScrollbarState::new(scroll_len)
            .position(offset.min(scroll_len.saturating_sub(1)))
            .viewport_content_length(inner_height);
        Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .render(area, buf, &mut scrollbar_state);
    }

    fn render_notice(&self, area: Rect, buf: &mut Buffer, message: String) {
        let width = to_u16(message.chars().count())
            .saturating_add(4)
            .max(24);
        let popup = popup_area(area, width, 5);
        Clear.render(popup, buf);
        Paragraph::new(vec![Line::from(message), Line::from(""), Line::from("(press any key)")])
            .wrap(Wrap { trim: true })
            .style(self.style.notice_style)
            .block(Block::default().borders(Borders::ALL).title("Notice"))
            .render(popup, buf);
    }
}

impl StatefulWidget for ExplorerView<'_> {
    type State = ExplorerState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let mut block = Block::default().borders(self.style.borders);
        if let Some(title) = self.style.title.clone() {
            block = block.title(title);
        }
        block = block
            .style(self.style.block_style)
            .border_style(self.style.border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        let status_height = u16::from(self.style.show_status && inner.height > 1);
        let list_area = Rect {
            height: inner.height - status_height,
            ..inner
        };
        let status_area = Rect {
            y: list_area.y + list_area.height,
            height: status_height,
            ..inner
        };

        let inner_height = list_area.height as usize;
        state.ensure_selection_visible_with_policy(inner_height, self.style.scroll_policy);
        let total_rows = state.visible_nodes().len();
        let scroll_rows = total_rows.saturating_sub(inner_height);

        let (table_area, scrollbar_area) = if scroll_rows > 0 && list_area.width > 1 {
            (
                Rect {
                    width: list_area.width - 1,
                    ..list_area
                },
                Some(Rect {
                    x: list_area.x + list_area.width - 1,
                    width: 1,
                    ..list_area
                }),
            )
        } else {
            (list_area, None)
        };

        let inset = to_u16(Span::raw(self.style.highlight_symbol).width());
        let mut table_state: TableState = *state.list_state();
        let icons = {
            let (rows, icons) = self.build_rows(state, inset);
            let table = Table::new(rows, [Constraint::Percentage(100)])
                .style(self.style.block_style)
                .row_highlight_style(self.style.highlight_style)
                .highlight_symbol(self.style.highlight_symbol)
                .highlight_spacing(HighlightSpacing::Always);
            StatefulWidget::render(table, table_area, buf, &mut table_state);
            icons
        };
        *state.list_state_mut() = table_state;
        state.set_geometry(RowGeometry {
            area: table_area,
            offset: table_state.offset(),
            icons,
        });

        if let Some(scrollbar_area) = scrollbar_area {
            Self::render_scrollbar(
                scrollbar_area,
                buf,
                table_state.offset(),
                inner_height,
                scroll_rows,
            );
        }

        if status_height > 0
            && let Some(status) = state.status()
        {
            Paragraph::new(status.to_string())
                .style(self.style.status_style)
                .render(status_area, buf);
        }

        if let Some(notice) = state.notice() {
            self.render_notice(area, buf, notice.to_string());
        }
    }
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
