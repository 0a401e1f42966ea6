use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::context::RowContext;
use crate::edit::EditSession;
use crate::model::NodeKind;

#[derive(Clone, Copy)]
pub struct ExplorerGlyphs<'a> {
    pub indent: &'a str,
    pub branch_last: &'a str,
    pub branch: &'a str,
    pub vert: &'a str,
    pub empty: &'a str,
    pub file: &'a str,
    pub folder_open: &'a str,
    pub folder_closed: &'a str,
}

impl ExplorerGlyphs<'static> {
    pub const fn unicode() -> Self {
        Self {
            indent: "   ",
            branch_last: "└──",
            branch: "├──",
            vert: "│  ",
            empty: "   ",
            file: "•",
            folder_open: "▼",
            folder_closed: "▶",
        }
    }

    pub const fn ascii() -> Self {
        Self {
            indent: "   ",
            branch_last: "`--",
            branch: "|--",
            vert: "|  ",
            empty: "   ",
            file: "*",
            folder_open: "v",
            folder_closed: ">",
        }
    }
}

impl<'a> ExplorerGlyphs<'a> {
    const fn icon(&self, kind: NodeKind, is_open: bool) -> &'a str {
        match kind {
            NodeKind::File => self.file,
            NodeKind::Folder if is_open => self.folder_open,
            NodeKind::Folder => self.folder_closed,
        }
    }
}

/// Spans for a committed name.
pub fn name_spans(name: &str, style: Style) -> Vec<Span<'_>> {
    vec![Span::styled(name, style)]
}

/// Spans for the inline name field, with the cursor cell highlighted.
pub fn edit_spans(session: &EditSession, style: Style, cursor_style: Style) -> Vec<Span<'_>> {
    let draft = session.draft();
    let (before, rest) = draft.split_at(session.cursor());
    let mut chars = rest.char_indices();
    let (under, after) = match chars.nth(1) {
        Some((split, _)) => rest.split_at(split),
        None => (rest, ""),
    };

    let mut spans = Vec::with_capacity(3);
    if !before.is_empty() {
        spans.push(Span::styled(before, style));
    }
    spans.push(Span::styled(if under.is_empty() { " " } else { under }, cursor_style));
    if !after.is_empty() {
        spans.push(Span::styled(after, style));
    }
    spans
}

/// Builds the label line of a row: indentation or guide lines, the kind icon, the name.
pub fn label_line<'a>(
    ctx: &RowContext<'_>,
    name: Vec<Span<'a>>,
    glyphs: &ExplorerGlyphs<'a>,
) -> Line<'a> {
    let icon = glyphs.icon(ctx.kind, ctx.is_open);
    let mut spans = Vec::with_capacity(ctx.is_tail_stack.len() + name.len() + 2);

    if ctx.level == 0 || !ctx.draw_lines {
        for _ in 0..ctx.level {
            spans.push(Span::raw(glyphs.empty));
        }
    } else {
        let last_level = (ctx.level as usize) - 1;
        for (l, is_last) in ctx.is_tail_stack.iter().enumerate() {
            let part = if l == last_level {
                if *is_last {
                    glyphs.branch_last
                } else {
                    glyphs.branch
                }
            } else if *is_last {
                glyphs.indent
            } else {
                glyphs.vert
            };
            spans.push(Span::styled(part, ctx.line_style));
        }
    }

    spans.push(Span::styled(icon, ctx.name_style));
    spans.push(Span::raw(" "));
    spans.extend(name);
    Line::from(spans)
}
