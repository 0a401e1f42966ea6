use ratatui::style::Style;

use crate::model::NodeKind;

#[derive(Clone, Copy)]
pub struct RowContext<'a> {
    pub level: u16,
    pub is_tail_stack: &'a [bool],
    pub kind: NodeKind,
    pub is_open: bool,
    pub draw_lines: bool,
    pub line_style: Style,
    pub name_style: Style,
}
