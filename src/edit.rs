use crate::model::NodeId;

/// Keys understood by the inline name field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditAction {
    Insert(char),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    /// Explicit commit (Enter). Rejected when the draft is blank.
    Commit,
    /// The field loses focus. A blank draft deletes the node.
    Blur,
}

/// Transient rename state for one node, kept outside the tree until committed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditSession {
    id: NodeId,
    draft: String,
    // Byte offset, always on a char boundary.
    cursor: usize,
}

impl EditSession {
    /// Starts editing `id` with the draft seeded from `name`, cursor at the end.
    pub fn new(id: NodeId, name: &str) -> Self {
        Self {
            id,
            draft: name.to_string(),
            cursor: name.len(),
        }
    }

    #[inline]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    #[inline]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Draft with surrounding whitespace removed, or `None` if nothing is left.
    pub fn committed_name(&self) -> Option<&str> {
        let trimmed = self.draft.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Applies a text-editing action. Returns `false` for `Commit`/`Blur`, which the
    /// owner of the session handles.
    pub fn apply(&mut self, action: EditAction) -> bool {
        match action {
            EditAction::Insert(ch) => self.insert(ch),
            EditAction::Backspace => self.backspace(),
            EditAction::Delete => self.delete(),
            EditAction::CursorLeft => self.move_left(),
            EditAction::CursorRight => self.move_right(),
            EditAction::CursorHome => self.cursor = 0,
            EditAction::CursorEnd => self.cursor = self.draft.len(),
            EditAction::Commit | EditAction::Blur => return false,
        }
        true
    }

    fn insert(&mut self, ch: char) {
        self.draft.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    fn backspace(&mut self) {
        if let Some(prev) = self.draft[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
            self.draft.remove(self.cursor);
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.draft.len() {
            self.draft.remove(self.cursor);
        }
    }

    fn move_left(&mut self) {
        if let Some(prev) = self.draft[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
        }
    }

    fn move_right(&mut self) {
        if let Some(next) = self.draft[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }
}
