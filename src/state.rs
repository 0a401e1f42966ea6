use std::rc::Rc;

use log::{debug, trace};
use ratatui::layout::{Position, Rect};
use ratatui::widgets::TableState;
use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::action::{AddTarget, ExplorerAction, ExplorerEvent};
use crate::announce::Announcement;
use crate::edit::{EditAction, EditSession};
use crate::error::{ExplorerError, Result};
use crate::flatten::{VisibleNode, flatten};
use crate::forest::Forest;
use crate::model::{Node, NodeId, NodeKind};
use crate::style::ScrollPolicy;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "keymap")]
use crate::keymap::ExplorerKeyBindings;
#[cfg(feature = "keymap")]
use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};

/// Explorer state: the forest, the selection, the active name field, and the
/// visible-row cache derived from the forest.
pub struct ExplorerState {
    forest: Forest,
    // Back-reference by id only; resolved through `visible_index` or `forest.find`.
    selected: Option<NodeId>,
    list_state: TableState,
    // Rebuilt from scratch on every forest replacement.
    visible_nodes: Vec<VisibleNode>,
    visible_index: FxHashMap<NodeId, usize>,
    edit: Option<EditSession>,
    notice: Option<ExplorerError>,
    status: Option<Announcement>,
    // `None` when the id space is used up.
    next_id: Option<u64>,
    draw_lines: bool,
    geometry: RowGeometry,
    #[cfg(feature = "keymap")]
    keymap: ExplorerKeyBindings,
}

/// A row under a screen position, resolved against the last rendered frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowHit {
    /// Index into [`ExplorerState::visible_nodes`].
    pub index: usize,
    pub id: NodeId,
    /// The position is on the file/folder icon.
    pub on_icon: bool,
}

// Where rows were drawn by the last render.
#[derive(Clone, Debug, Default)]
pub(crate) struct RowGeometry {
    pub(crate) area: Rect,
    pub(crate) offset: usize,
    // Per visible row: icon start column (relative to `area.x`) and width.
    pub(crate) icons: Vec<(u16, u16)>,
}

/// Snapshot of state (forest, selection, scroll, guide lines).
///
/// With the `serde` feature enabled, this type derives `Serialize`/`Deserialize`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct ExplorerSnapshot {
    pub forest: Forest,
    pub selected: Option<NodeId>,
    /// Scroll offset within the visible list.
    pub offset: usize,
    pub draw_lines: bool,
}

impl Default for ExplorerState {
    fn default() -> Self {
        Self::new(Forest::new())
    }
}

impl ExplorerState {
    /// Creates a state over `forest` with nothing selected.
    pub fn new(forest: Forest) -> Self {
        let mut state = Self {
            next_id: next_free_id(&forest),
            forest,
            selected: None,
            list_state: TableState::default(),
            visible_nodes: Vec::new(),
            visible_index: FxHashMap::with_hasher(FxBuildHasher),
            edit: None,
            notice: None,
            status: None,
            draw_lines: true,
            geometry: RowGeometry::default(),
            #[cfg(feature = "keymap")]
            keymap: ExplorerKeyBindings::new(),
        };
        state.refresh_visible();
        state
    }

    #[cfg(feature = "keymap")]
    /// Returns a mutable reference to the key binding set.
    pub const fn keymap_mut(&mut self) -> &mut ExplorerKeyBindings {
        &mut self.keymap
    }

    #[inline]
    pub const fn forest(&self) -> &Forest {
        &self.forest
    }

    /// Rows currently visible, in display order.
    #[inline]
    pub fn visible_nodes(&self) -> &[VisibleNode] {
        &self.visible_nodes
    }

    pub(crate) const fn list_state(&self) -> &TableState {
        &self.list_state
    }

    pub(crate) const fn list_state_mut(&mut self) -> &mut TableState {
        &mut self.list_state
    }

    #[inline]
    pub const fn selected_id(&self) -> Option<NodeId> {
        self.selected
    }

    /// The selected node, looked up in the forest (it may be hidden by a closed ancestor).
    pub fn selected_node(&self) -> Option<&Rc<Node>> {
        self.selected.and_then(|id| self.forest.find(id))
    }

    /// Row index of the selection, or `None` if nothing visible is selected.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected.and_then(|id| self.visible_index_of(id))
    }

    #[inline]
    pub const fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// Blocking message; while present the next key only dismisses it.
    #[inline]
    pub const fn notice(&self) -> Option<&ExplorerError> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Last create/rename/delete announcement.
    #[inline]
    pub const fn status(&self) -> Option<&Announcement> {
        self.status.as_ref()
    }

    /// Returns whether guide lines are drawn.
    #[inline]
    pub const fn draw_lines(&self) -> bool {
        self.draw_lines
    }

    /// Enables or disables drawing of guide lines.
    pub const fn set_draw_lines(&mut self, draw: bool) {
        self.draw_lines = draw;
    }

    /// Captures a snapshot of the current state.
    pub fn snapshot(&self) -> ExplorerSnapshot {
        ExplorerSnapshot {
            forest: self.forest.clone(),
            selected: self.selected,
            offset: self.list_state.offset(),
            draw_lines: self.draw_lines,
        }
    }

    /// Restores state from a snapshot. Any open name field and notice are dropped.
    pub fn restore(&mut self, snapshot: ExplorerSnapshot) {
        self.next_id = self.next_id.zip(next_free_id(&snapshot.forest)).map(|(a, b)| a.max(b));
        self.forest = snapshot.forest;
        self.selected = snapshot
            .selected
            .filter(|id| self.forest.contains(*id));
        self.draw_lines = snapshot.draw_lines;
        self.edit = None;
        self.notice = None;
        *self.list_state.offset_mut() = snapshot.offset;
        self.refresh_visible();
    }

    /// Selects `id` if it exists in the forest.
    pub fn select(&mut self, id: NodeId) -> bool {
        if !self.forest.contains(id) {
            return false;
        }
        trace!("select {id}");
        self.selected = Some(id);
        self.sync_list_selection();
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.sync_list_selection();
    }

    /// Moves selection to the next visible row.
    ///
    /// A selection that is absent or hidden counts as row -1, so the first visible row
    /// is selected.
    pub fn select_next(&mut self) -> bool {
        let next = self.selected_index().map_or(0, |idx| idx + 1);
        self.select_row(next)
    }

    /// Moves selection to the previous visible row. No-op at the top or when the
    /// selection is not visible.
    pub fn select_prev(&mut self) -> bool {
        match self.selected_index() {
            Some(idx) if idx > 0 => self.select_row(idx - 1),
            _ => false,
        }
    }

    /// Selects the first visible row.
    pub fn select_first(&mut self) -> bool {
        self.select_row(0)
    }

    /// Selects the last visible row.
    pub fn select_last(&mut self) -> bool {
        self.visible_nodes
            .len()
            .checked_sub(1)
            .is_some_and(|idx| self.select_row(idx))
    }

    /// Moves selection to the parent folder of the selected row.
    pub fn select_parent(&mut self) -> bool {
        let parent = self
            .selected_index()
            .and_then(|idx| self.visible_nodes[idx].parent);
        parent.is_some_and(|parent| self.select(parent))
    }

    /// Opens the selected folder if it is closed.
    pub fn expand_selected(&mut self) -> bool {
        match self.selected_node() {
            Some(node) if node.is_folder() && !node.is_open() => {
                let id = node.id();
                self.set_open(id, true)
            }
            _ => false,
        }
    }

    /// Closes the selected folder, or moves to the parent when there is nothing to close.
    pub fn collapse_selected(&mut self) -> bool {
        match self.selected_node() {
            Some(node) if node.is_open() => {
                let id = node.id();
                self.set_open(id, false)
            }
            Some(_) => self.select_parent(),
            None => false,
        }
    }

    /// Toggles a folder open/closed. Files and unknown ids are ignored.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        match self.forest.find(id) {
            Some(node) if node.is_folder() => {
                let open = !node.is_open();
                self.set_open(id, open)
            }
            _ => false,
        }
    }

    /// Toggles the selected folder; selection is unchanged.
    pub fn toggle_selected(&mut self) -> bool {
        self.selected.is_some_and(|id| self.toggle(id))
    }

    /// Sets the expansion flag of a folder.
    pub fn set_open(&mut self, id: NodeId, open: bool) -> bool {
        if !self.forest.find(id).is_some_and(|node| node.is_folder()) {
            return false;
        }
        debug!("set folder {id} open={open}");
        let forest = self.forest.update(id, |node| node.with_open(open));
        self.replace_forest(forest);
        true
    }

    /// Creates an unnamed node in edit mode and selects it.
    ///
    /// Any name field that is still open loses focus first. Adding into something that
    /// is not a folder raises [`ExplorerError::NoFolderTarget`] as a notice.
    pub fn add_child(&mut self, target: AddTarget, kind: NodeKind) -> Result<NodeId> {
        self.finish_pending_edit();

        if let AddTarget::Folder(parent) = target
            && !self.forest.find(parent).is_some_and(|node| node.is_folder())
        {
            return Err(self.reject(ExplorerError::NoFolderTarget));
        }

        let Some(id) = self.allocate_id() else {
            return Err(self.reject(ExplorerError::IdsExhausted));
        };
        let node = Node::pending(id, kind);
        let forest = match target {
            AddTarget::Root => self.forest.insert_root(node),
            AddTarget::Folder(parent) => self.forest.insert_child(parent, node),
        };
        debug!("created {kind} {id} in {target:?}");
        self.replace_forest(forest);
        self.status = Some(Announcement::Created(kind));
        self.selected = Some(id);
        self.sync_list_selection();
        self.edit = Some(EditSession::new(id, ""));
        Ok(id)
    }

    /// Adds into the selected folder.
    pub fn add_to_selected(&mut self, kind: NodeKind) -> Result<NodeId> {
        match self.selected_node() {
            Some(node) if node.is_folder() => {
                let parent = node.id();
                self.add_child(AddTarget::Folder(parent), kind)
            }
            _ => Err(self.reject(ExplorerError::NoFolderTarget)),
        }
    }

    /// Commits a new name for `id` and clears its edit flag.
    ///
    /// The name is trimmed; a blank name raises [`ExplorerError::EmptyName`] as a notice.
    pub fn rename(&mut self, id: NodeId, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(self.reject(ExplorerError::EmptyName));
        }
        let kind = self
            .forest
            .find(id)
            .map(|node| node.kind())
            .ok_or(ExplorerError::MissingNode(id))?;
        debug!("renamed {kind} {id} to {name:?}");
        let forest = self
            .forest
            .update(id, |node| node.with_name(name).with_editing(false));
        self.replace_forest(forest);
        self.status = Some(Announcement::Renamed {
            kind,
            name: name.to_string(),
        });
        Ok(())
    }

    /// Deletes `id` and its subtree.
    ///
    /// If the selection disappears with it, the row that takes the deleted row's place
    /// is selected (or the new last row, or nothing).
    pub fn delete(&mut self, id: NodeId) -> Option<Announcement> {
        let name = self.forest.find(id)?.name().to_string();
        let anchor = self
            .visible_index_of(id)
            .or_else(|| self.selected_index());

        debug!("deleted {id} ({name:?})");
        let forest = self.forest.delete(id);
        self.replace_forest(forest);

        if self
            .edit
            .as_ref()
            .is_some_and(|session| !self.forest.contains(session.id()))
        {
            self.edit = None;
        }
        if self.selected.is_some_and(|sel| !self.forest.contains(sel)) {
            self.selected = anchor.and_then(|idx| {
                let last = self.visible_nodes.len().checked_sub(1)?;
                Some(self.visible_nodes[idx.min(last)].id())
            });
            self.sync_list_selection();
        }

        let announcement = Announcement::Deleted(name);
        self.status = Some(announcement.clone());
        Some(announcement)
    }

    /// Deletes the selected node.
    pub fn delete_selected(&mut self) -> Option<Announcement> {
        self.selected.and_then(|id| self.delete(id))
    }

    /// Opens the name field for `id`, seeded with its current name.
    pub fn begin_rename(&mut self, id: NodeId) -> Result<()> {
        if self.edit.as_ref().is_some_and(|session| session.id() == id) {
            return Ok(());
        }
        self.finish_pending_edit();
        let node = self.forest.find(id).ok_or(ExplorerError::MissingNode(id))?;
        self.edit = Some(EditSession::new(id, node.name()));
        let forest = self.forest.update(id, |node| node.with_editing(true));
        self.replace_forest(forest);
        Ok(())
    }

    /// Opens the name field for the selected node.
    pub fn rename_selected(&mut self) -> Result<()> {
        let id = self.selected.ok_or(ExplorerError::NoSelection)?;
        self.begin_rename(id)
    }

    /// Explicit commit of the open name field (Enter).
    ///
    /// A blank draft is rejected and the field stays open.
    pub fn commit_edit(&mut self) -> Result<()> {
        let session = self.edit.as_ref().ok_or(ExplorerError::NoEditSession)?;
        let id = session.id();
        let Some(name) = session.committed_name().map(str::to_string) else {
            return Err(self.reject(ExplorerError::EmptyName));
        };
        self.edit = None;
        self.rename(id, &name)
    }

    /// The name field loses focus: a blank draft deletes the node, anything else commits.
    pub fn blur_edit(&mut self) -> Result<()> {
        let session = self.edit.take().ok_or(ExplorerError::NoEditSession)?;
        match session.committed_name() {
            Some(name) => self.rename(session.id(), name),
            None => {
                self.delete(session.id());
                Ok(())
            }
        }
    }

    /// Applies a key to the open name field.
    pub fn edit_input(&mut self, action: EditAction) -> bool {
        match action {
            EditAction::Commit => !matches!(self.commit_edit(), Err(ExplorerError::NoEditSession)),
            EditAction::Blur => self.blur_edit().is_ok(),
            _ => self
                .edit
                .as_mut()
                .is_some_and(|session| session.apply(action)),
        }
    }

    /// Handles an explorer action and returns the resulting event.
    pub fn handle_action<C>(&mut self, action: ExplorerAction<C>) -> ExplorerEvent<C> {
        if self.notice.is_some() {
            self.dismiss_notice();
            return ExplorerEvent::Handled;
        }

        if let ExplorerAction::Edit(edit) = action {
            return handled(self.edit_input(edit));
        }
        if matches!(
            action,
            ExplorerAction::Custom(_) | ExplorerAction::ToggleSidebar
        ) {
            return ExplorerEvent::Action(action);
        }

        // Any other interaction takes focus away from an open name field. If that
        // removes the selected (blank) node, the action has lost its target.
        let target = self.selected;
        self.finish_pending_edit();
        if action.targets_selection() && target.is_some_and(|id| !self.forest.contains(id)) {
            return ExplorerEvent::Handled;
        }

        match action {
            ExplorerAction::SelectPrev => handled(self.select_prev()),
            ExplorerAction::SelectNext => handled(self.select_next()),
            ExplorerAction::SelectFirst => handled(self.select_first()),
            ExplorerAction::SelectLast => handled(self.select_last()),
            ExplorerAction::SelectParent => handled(self.select_parent()),
            ExplorerAction::Expand => handled(self.expand_selected()),
            ExplorerAction::Collapse => handled(self.collapse_selected()),
            ExplorerAction::ToggleNode => handled(self.toggle_selected()),
            // Failures surface as a notice, which is itself a state change.
            ExplorerAction::AddFile => {
                let _ = self.add_to_selected(NodeKind::File);
                ExplorerEvent::Handled
            }
            ExplorerAction::AddFolder => {
                let _ = self.add_to_selected(NodeKind::Folder);
                ExplorerEvent::Handled
            }
            ExplorerAction::AddRootFile => {
                let _ = self.add_child(AddTarget::Root, NodeKind::File);
                ExplorerEvent::Handled
            }
            ExplorerAction::AddRootFolder => {
                let _ = self.add_child(AddTarget::Root, NodeKind::Folder);
                ExplorerEvent::Handled
            }
            ExplorerAction::RenameNode => handled(self.rename_selected().is_ok()),
            ExplorerAction::DeleteNode => handled(self.delete_selected().is_some()),
            ExplorerAction::ToggleGuides => {
                self.draw_lines = !self.draw_lines;
                ExplorerEvent::Handled
            }
            ExplorerAction::ToggleSidebar
            | ExplorerAction::Edit(_)
            | ExplorerAction::Custom(_) => ExplorerEvent::Action(action),
        }
    }

    pub(crate) fn set_geometry(&mut self, geometry: RowGeometry) {
        self.geometry = geometry;
    }

    /// Resolves a screen position to the row drawn there by the last render.
    pub fn hit_test(&self, column: u16, row: u16) -> Option<RowHit> {
        let geometry = &self.geometry;
        if !geometry.area.contains(Position::new(column, row)) {
            return None;
        }
        let index = geometry.offset + usize::from(row - geometry.area.y);
        let id = self.visible_nodes.get(index)?.id();
        let x = column - geometry.area.x;
        let on_icon = geometry
            .icons
            .get(index)
            .is_some_and(|&(start, width)| x >= start && x - start < width);
        Some(RowHit { index, id, on_icon })
    }

    /// Click at a screen position: selects the row there, and a click on a folder's
    /// icon also toggles it.
    ///
    /// Clicking the row being renamed keeps its name field open; clicking any other row
    /// takes focus away from it first.
    pub fn click(&mut self, column: u16, row: u16) -> bool {
        if self.notice.is_some() {
            self.dismiss_notice();
            return true;
        }
        let Some(hit) = self.hit_test(column, row) else {
            return false;
        };
        if self.edit.as_ref().is_some_and(|session| session.id() == hit.id) {
            return true;
        }
        self.finish_pending_edit();
        if !self.select(hit.id) {
            return true;
        }
        if hit.on_icon {
            self.toggle(hit.id);
        }
        true
    }

    #[cfg(feature = "keymap")]
    /// Handles a mouse event: left click selects (and toggles on the icon), the wheel
    /// moves the selection.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> ExplorerEvent<()> {
        let inside = self
            .geometry
            .area
            .contains(Position::new(mouse.column, mouse.row));
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => handled(self.click(mouse.column, mouse.row)),
            MouseEventKind::ScrollDown if inside => self.handle_action(ExplorerAction::SelectNext),
            MouseEventKind::ScrollUp if inside => self.handle_action(ExplorerAction::SelectPrev),
            _ => ExplorerEvent::Unhandled,
        }
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event into an action and handles it.
    ///
    /// While a notice is shown the key only dismisses it; while a name field is open
    /// keys go to the field.
    pub fn handle_key(&mut self, key: KeyEvent) -> ExplorerEvent<()> {
        self.handle_key_with(key, |_| None)
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event with a custom mapping and handles it.
    pub fn handle_key_with<C, F>(&mut self, key: KeyEvent, custom: F) -> ExplorerEvent<C>
    where
        F: Fn(KeyEvent) -> Option<C>,
    {
        if self.notice.is_some() {
            self.dismiss_notice();
            return ExplorerEvent::Handled;
        }
        let action = if self.edit.is_some() {
            self.keymap.resolve_edit(key).map(ExplorerAction::Edit)
        } else {
            self.keymap.resolve_with(key, custom)
        };
        let Some(action) = action else {
            return ExplorerEvent::Unhandled;
        };
        self.handle_action(action)
    }

    /// Adjusts scroll offset so the selection is within the viewport.
    pub fn ensure_selection_visible(&mut self, viewport_height: usize) {
        let Some(selected) = self.list_state.selected() else {
            return;
        };
        let viewport_height = viewport_height.max(1);
        let offset = self.list_state.offset();
        if selected < offset {
            *self.list_state.offset_mut() = selected;
        } else if selected >= offset + viewport_height {
            *self.list_state.offset_mut() = selected + 1 - viewport_height;
        }
    }

    /// Adjusts selection visibility according to the provided scroll policy.
    pub fn ensure_selection_visible_with_policy(
        &mut self,
        viewport_height: usize,
        policy: ScrollPolicy,
    ) {
        match policy {
            ScrollPolicy::KeepInView => self.ensure_selection_visible(viewport_height),
            ScrollPolicy::CenterOnSelect => {
                self.ensure_selection_visible_centered(viewport_height);
            }
        }
    }

    fn ensure_selection_visible_centered(&mut self, viewport_height: usize) {
        let Some(selected) = self.list_state.selected() else {
            return;
        };
        let viewport_height = viewport_height.max(1);
        let total = self.visible_nodes.len();
        if total <= viewport_height {
            *self.list_state.offset_mut() = 0;
            return;
        }

        // Center selection, then clamp to valid scroll range.
        let half = viewport_height / 2;
        let max_offset = total.saturating_sub(viewport_height);
        *self.list_state.offset_mut() = selected.saturating_sub(half).min(max_offset);
    }

    fn visible_index_of(&self, id: NodeId) -> Option<usize> {
        self.visible_index.get(&id).copied()
    }

    fn select_row(&mut self, idx: usize) -> bool {
        let Some(id) = self.visible_nodes.get(idx).map(VisibleNode::id) else {
            return false;
        };
        trace!("select row {idx} ({id})");
        self.selected = Some(id);
        self.list_state.select(Some(idx));
        true
    }

    fn replace_forest(&mut self, forest: Forest) {
        self.forest = forest;
        self.refresh_visible();
    }

    fn refresh_visible(&mut self) {
        self.visible_nodes = flatten(&self.forest);
        self.visible_index.clear();
        self.visible_index.extend(
            self.visible_nodes
                .iter()
                .enumerate()
                .map(|(idx, row)| (row.id(), idx)),
        );
        self.sync_list_selection();
    }

    fn sync_list_selection(&mut self) {
        let idx = self.selected_index();
        self.list_state.select(idx);
    }

    fn finish_pending_edit(&mut self) {
        if self.edit.is_some() {
            let _ = self.blur_edit();
        }
    }

    fn reject(&mut self, err: ExplorerError) -> ExplorerError {
        debug!("rejected: {err}");
        self.notice = Some(err.clone());
        err
    }

    fn allocate_id(&mut self) -> Option<NodeId> {
        let id = self.next_id?;
        self.next_id = id.checked_add(1);
        Some(NodeId(id))
    }
}

// `None` once the largest id is `u64::MAX`; ids are never reused.
fn next_free_id(forest: &Forest) -> Option<u64> {
    forest
        .ids()
        .into_iter()
        .map(|id| id.0)
        .max()
        .map_or(Some(1), |max| max.checked_add(1))
}

const fn handled<C>(changed: bool) -> ExplorerEvent<C> {
    if changed {
        ExplorerEvent::Handled
    } else {
        ExplorerEvent::Unhandled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    // outer(1, open) -> [inner(2, closed) -> [hidden(3)], readme(4)], sibling(5)
    fn two_level() -> ExplorerState {
        ExplorerState::new(Forest::from_nodes([
            Node::folder(
                NodeId(1),
                "outer",
                true,
                [
                    Node::folder(NodeId(2), "inner", false, [Node::file(NodeId(3), "hidden")]),
                    Node::file(NodeId(4), "readme.md"),
                ],
            ),
            Node::file(NodeId(5), "sibling"),
        ]))
    }

    fn visible_ids(state: &ExplorerState) -> Vec<u64> {
        state.visible_nodes().iter().map(|row| row.id().0).collect()
    }

    #[test]
    fn add_folder_to_empty_forest() {
        let mut state = ExplorerState::default();
        let id = state.add_child(AddTarget::Root, NodeKind::Folder);

        let roots = state.forest().roots();
        assert_eq!(roots.len(), 1);
        assert_eq!(Some(roots[0].id()), id.ok());
        assert_eq!(roots[0].kind(), NodeKind::Folder);
        assert_eq!(roots[0].name(), "");
        assert!(roots[0].is_editing());
        assert_eq!(state.edit_session().map(EditSession::id), Some(roots[0].id()));
        assert_eq!(state.status().map(ToString::to_string).as_deref(), Some("Folder created"));
    }

    #[test]
    fn add_file_under_open_folder() {
        let mut state =
            ExplorerState::new(Forest::from_nodes([Node::folder(NodeId(1), "Docs", true, [])]));
        assert!(state.add_child(AddTarget::Folder(NodeId(1)), NodeKind::File).is_ok());

        let docs = &state.forest().roots()[0];
        assert!(docs.is_open());
        assert_eq!(docs.children().len(), 1);
        assert_eq!(docs.children()[0].kind(), NodeKind::File);
        assert_eq!(state.status().map(ToString::to_string).as_deref(), Some("File created"));
    }

    #[test]
    fn delete_selected_removes_node_and_redirects_selection() {
        let mut state = two_level();
        assert!(state.select(NodeId(4)));
        let announcement = state.delete_selected();

        assert_eq!(announcement.map(|a| a.to_string()).as_deref(), Some("readme.md deleted"));
        assert!(!state.forest().contains(NodeId(4)));
        assert_ne!(state.selected_id(), Some(NodeId(4)));
        // The row that followed the deleted one takes its place.
        assert_eq!(state.selected_id(), Some(NodeId(5)));
    }

    #[test]
    fn deleting_last_row_selects_new_last_row() {
        let mut state = two_level();
        state.select(NodeId(5));
        state.delete_selected();
        assert_eq!(state.selected_id(), Some(NodeId(4)));

        let mut state = ExplorerState::new(Forest::from_nodes([Node::file(NodeId(1), "x")]));
        state.select(NodeId(1));
        state.delete_selected();
        assert_eq!(state.selected_id(), None);
        assert!(state.forest().is_empty());
    }

    #[test]
    fn deleting_ancestor_of_selection_redirects_selection() {
        let mut state = two_level();
        state.select(NodeId(4));
        state.delete(NodeId(1));
        assert_eq!(visible_ids(&state), vec![5]);
        assert_eq!(state.selected_id(), Some(NodeId(5)));
    }

    #[test]
    fn down_from_no_selection_skips_hidden_children() {
        let mut state = two_level();
        let mut seen = Vec::new();
        for _ in 0..6 {
            state.select_next();
            seen.extend(state.selected_id().map(|id| id.0));
        }
        assert_eq!(seen[0], 1);
        assert!(!seen.contains(&3));
        assert_eq!(seen, vec![1, 2, 4, 5, 5, 5]);
    }

    #[test]
    fn down_from_hidden_selection_selects_first_row() {
        let mut state = two_level();
        state.toggle(NodeId(2));
        state.select(NodeId(3));
        state.toggle(NodeId(2));
        assert_eq!(state.selected_index(), None);

        assert!(state.select_next());
        assert_eq!(state.selected_id(), Some(NodeId(1)));
    }

    #[test]
    fn up_is_noop_at_start_and_without_visible_selection() {
        let mut state = two_level();
        assert!(!state.select_prev());
        assert_eq!(state.selected_id(), None);

        state.select_first();
        assert!(!state.select_prev());
        assert_eq!(state.selected_id(), Some(NodeId(1)));

        state.select_last();
        assert!(state.select_prev());
        assert_eq!(state.selected_id(), Some(NodeId(4)));
    }

    #[test]
    fn enter_toggles_folder_without_moving_selection() {
        let mut state = two_level();
        state.select(NodeId(2));
        assert_eq!(
            state.handle_action::<()>(ExplorerAction::ToggleNode),
            ExplorerEvent::Handled
        );
        assert_eq!(visible_ids(&state), vec![1, 2, 3, 4, 5]);
        assert_eq!(state.selected_id(), Some(NodeId(2)));
        assert_eq!(state.status(), None);

        state.select(NodeId(4));
        assert_eq!(
            state.handle_action::<()>(ExplorerAction::ToggleNode),
            ExplorerEvent::Unhandled
        );
    }

    #[test]
    fn collapse_then_collapse_again_moves_to_parent() {
        let mut state = two_level();
        state.select(NodeId(4));
        assert!(state.collapse_selected());
        assert_eq!(state.selected_id(), Some(NodeId(1)));
        assert!(state.collapse_selected());
        assert_eq!(visible_ids(&state), vec![1, 5]);
        assert!(state.expand_selected());
        assert_eq!(visible_ids(&state), vec![1, 2, 4, 5]);
    }

    #[test]
    fn blank_explicit_commit_is_rejected() {
        let mut state = two_level();
        assert!(state.begin_rename(NodeId(4)).is_ok());
        if let Some(session) = state.edit.as_mut() {
            session.apply(EditAction::CursorHome);
            for _ in 0.."readme.md".len() {
                session.apply(EditAction::Delete);
            }
            for _ in 0..3 {
                session.apply(EditAction::Insert(' '));
            }
        }

        assert_eq!(state.commit_edit(), Err(ExplorerError::EmptyName));
        assert_eq!(state.notice(), Some(&ExplorerError::EmptyName));
        assert_eq!(
            state.forest().find(NodeId(4)).map(|n| n.name()),
            Some("readme.md")
        );
        assert_eq!(state.edit_session().map(EditSession::draft), Some("   "));
    }

    #[test]
    fn commit_trims_renames_and_announces() {
        let mut state = ExplorerState::default();
        assert!(state.add_child(AddTarget::Root, NodeKind::Folder).is_ok());
        for ch in " src ".chars() {
            state.edit_input(EditAction::Insert(ch));
        }
        assert!(state.edit_input(EditAction::Commit));

        let root = &state.forest().roots()[0];
        assert_eq!(root.name(), "src");
        assert!(!root.is_editing());
        assert!(state.edit_session().is_none());
        assert_eq!(
            state.status().map(ToString::to_string).as_deref(),
            Some("Folder renamed to src")
        );
    }

    #[test]
    fn blur_with_blank_draft_deletes_new_node() {
        let mut state = two_level();
        let id = state.add_child(AddTarget::Folder(NodeId(1)), NodeKind::File);
        assert!(id.is_ok());
        assert!(state.blur_edit().is_ok());

        assert_eq!(state.forest().len(), 5);
        assert!(state.edit_session().is_none());
        assert_eq!(state.status().map(ToString::to_string).as_deref(), Some("Item deleted"));
    }

    #[test]
    fn starting_a_new_node_blurs_the_open_field() {
        let mut state = ExplorerState::default();
        let first = state.add_child(AddTarget::Root, NodeKind::File).ok();
        let second = state.add_child(AddTarget::Root, NodeKind::File).ok();

        assert!(first.is_some_and(|id| !state.forest().contains(id)));
        assert_eq!(state.edit_session().map(EditSession::id), second);
        assert_eq!(state.forest().len(), 1);
    }

    #[test]
    fn add_without_folder_target_raises_notice() {
        let mut state = ExplorerState::default();
        assert_eq!(
            state.add_to_selected(NodeKind::File),
            Err(ExplorerError::NoFolderTarget)
        );
        assert_eq!(state.notice(), Some(&ExplorerError::NoFolderTarget));
        assert!(state.forest().is_empty());

        let mut state = two_level();
        state.select(NodeId(5));
        assert_eq!(
            state.handle_action::<()>(ExplorerAction::AddFile),
            ExplorerEvent::Handled
        );
        assert_eq!(state.forest().len(), 5);
        // The notice swallows the next action.
        assert_eq!(
            state.handle_action::<()>(ExplorerAction::SelectNext),
            ExplorerEvent::Handled
        );
        assert!(state.notice().is_none());
        assert_eq!(state.selected_id(), Some(NodeId(5)));
    }

    #[test]
    fn ids_stay_unique_across_adds_and_deletes() {
        let mut state = two_level();
        for round in 0..5 {
            let id = state.add_child(AddTarget::Folder(NodeId(1)), NodeKind::Folder);
            assert!(id.is_ok());
            let renamed = state.rename(id.unwrap_or(NodeId(0)), &format!("f{round}"));
            assert!(renamed.is_ok());
            state.edit = None;
            if round % 2 == 0 {
                state.delete(NodeId(4));
            }
        }
        let ids = state.forest().ids();
        let unique: FxHashSet<_> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len());
        assert!(ids.iter().all(|id| id.0 >= 1));
    }

    #[test]
    fn other_actions_blur_open_field_first() {
        let mut state = two_level();
        state.select(NodeId(5));
        assert!(state.begin_rename(NodeId(5)).is_ok());
        assert!(state.forest().find(NodeId(5)).is_some_and(|n| n.is_editing()));
        state.edit_input(EditAction::Insert('2'));
        state.handle_action::<()>(ExplorerAction::SelectPrev);

        assert!(state.edit_session().is_none());
        assert_eq!(
            state.forest().find(NodeId(5)).map(|n| n.name()),
            Some("sibling2")
        );
        assert_eq!(state.selected_id(), Some(NodeId(4)));
    }

    #[test]
    fn snapshot_restore_roundtrip() {
        let mut state = two_level();
        state.select(NodeId(4));
        state.set_draw_lines(false);
        let snapshot = state.snapshot();

        let mut restored = ExplorerState::default();
        restored.restore(snapshot);
        assert_eq!(restored.forest(), state.forest());
        assert_eq!(restored.selected_id(), Some(NodeId(4)));
        assert!(!restored.draw_lines());
        assert_eq!(restored.selected_index(), Some(2));
    }

    #[test]
    fn center_policy_clamps_offset() {
        let nodes = (1..=20).map(|i| Node::file(NodeId(i), format!("f{i}")));
        let mut state = ExplorerState::new(Forest::from_nodes(nodes));
        state.select_last();
        state.ensure_selection_visible_with_policy(5, ScrollPolicy::CenterOnSelect);
        assert_eq!(state.list_state().offset(), 15);

        state.select_first();
        state.ensure_selection_visible_with_policy(5, ScrollPolicy::KeepInView);
        assert_eq!(state.list_state().offset(), 0);
    }

    #[test]
    fn delete_while_blank_new_node_is_open_removes_only_that_node() {
        let mut state = ExplorerState::new(Forest::from_nodes([Node::folder(
            NodeId(1),
            "docs",
            true,
            [Node::file(NodeId(2), "a"), Node::file(NodeId(3), "b")],
        )]));
        state.select(NodeId(2));
        assert_eq!(state.add_child(AddTarget::Root, NodeKind::File), Ok(NodeId(4)));

        assert_eq!(state.handle_action::<()>(ExplorerAction::DeleteNode), ExplorerEvent::Handled);
        assert_eq!(state.forest().ids(), vec![NodeId(1), NodeId(2), NodeId(3)]);
        assert!(state.edit_session().is_none());
    }

    #[test]
    fn toggle_while_blank_new_node_is_open_leaves_neighbour_alone() {
        let mut state = two_level();
        state.select(NodeId(1));
        assert!(state.add_child(AddTarget::Folder(NodeId(1)), NodeKind::File).is_ok());

        state.handle_action::<()>(ExplorerAction::ToggleNode);
        assert_eq!(state.forest().len(), 5);
        assert!(state.forest().find(NodeId(1)).is_some_and(|n| n.is_open()));
    }

    #[test]
    fn root_add_after_blank_new_node_still_adds() {
        let mut state = ExplorerState::default();
        assert!(state.add_child(AddTarget::Root, NodeKind::File).is_ok());
        state.handle_action::<()>(ExplorerAction::AddRootFolder);

        assert_eq!(state.forest().len(), 1);
        assert_eq!(state.forest().roots()[0].kind(), NodeKind::Folder);
        assert!(state.edit_session().is_some());
    }

    #[test]
    fn ids_run_out_without_reuse() {
        let mut state =
            ExplorerState::new(Forest::from_nodes([Node::file(NodeId(u64::MAX), "last")]));
        assert_eq!(
            state.add_child(AddTarget::Root, NodeKind::File),
            Err(ExplorerError::IdsExhausted)
        );
        assert_eq!(state.forest().len(), 1);
        assert_eq!(state.notice(), Some(&ExplorerError::IdsExhausted));
    }

    #[test]
    fn last_free_id_is_used_once() {
        let mut state =
            ExplorerState::new(Forest::from_nodes([Node::file(NodeId(u64::MAX - 1), "a")]));
        assert_eq!(state.add_child(AddTarget::Root, NodeKind::File), Ok(NodeId(u64::MAX)));
        state.edit_input(EditAction::Insert('b'));
        assert!(state.commit_edit().is_ok());

        assert_eq!(
            state.add_child(AddTarget::Root, NodeKind::File),
            Err(ExplorerError::IdsExhausted)
        );
        let ids = state.forest().ids();
        let unique: FxHashSet<_> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len());
    }

    #[test]
    fn rename_without_selection_reports_no_selection() {
        let mut state = two_level();
        assert_eq!(state.rename_selected(), Err(ExplorerError::NoSelection));
        assert!(state.edit_session().is_none());
    }

    #[cfg(feature = "keymap")]
    mod keys {
        use super::*;
        use crossterm::event::{KeyCode, KeyModifiers};

        fn press(state: &mut ExplorerState, code: KeyCode) -> ExplorerEvent<()> {
            state.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
        }

        #[test]
        fn delete_key_removes_selection() {
            let mut state = two_level();
            press(&mut state, KeyCode::Down);
            press(&mut state, KeyCode::Down);
            assert_eq!(state.selected_id(), Some(NodeId(2)));
            press(&mut state, KeyCode::Delete);
            assert!(!state.forest().contains(NodeId(2)));
            assert_ne!(state.selected_id(), Some(NodeId(2)));
        }

        #[test]
        fn whitespace_name_via_enter_keeps_field_open() {
            let mut state = ExplorerState::default();
            press(&mut state, KeyCode::Char('N'));
            for _ in 0..3 {
                press(&mut state, KeyCode::Char(' '));
            }
            press(&mut state, KeyCode::Enter);
            assert_eq!(state.notice(), Some(&ExplorerError::EmptyName));
            assert!(state.edit_session().is_some());

            // First key dismisses the notice, then typing continues in the field.
            press(&mut state, KeyCode::Char('x'));
            assert!(state.notice().is_none());
            press(&mut state, KeyCode::Char('x'));
            press(&mut state, KeyCode::Enter);
            assert_eq!(state.forest().roots()[0].name(), "x");
        }

        #[test]
        fn escape_on_unnamed_node_deletes_it() {
            let mut state = two_level();
            state.select(NodeId(1));
            press(&mut state, KeyCode::Char('a'));
            assert_eq!(state.forest().len(), 6);
            press(&mut state, KeyCode::Esc);
            assert_eq!(state.forest().len(), 5);
        }

        #[test]
        fn ctrl_b_is_forwarded_to_host() {
            let mut state = two_level();
            let event = state.handle_key(KeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL));
            assert_eq!(event, ExplorerEvent::Action(ExplorerAction::ToggleSidebar));
        }
    }
}
