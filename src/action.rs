use crate::edit::EditAction;
use crate::model::NodeId;

/// Actions that a user or application can initiate on the explorer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExplorerAction<Custom = ()> {
    /// Move selection to the previous visible row.
    SelectPrev,
    /// Move selection to the next visible row.
    SelectNext,
    /// Select the first visible row.
    SelectFirst,
    /// Select the last visible row.
    SelectLast,
    /// Move selection to the parent folder.
    SelectParent,
    /// Open the selected folder.
    Expand,
    /// Close the selected folder, or move to its parent if it is already closed.
    Collapse,
    /// Toggle the selected folder open/closed.
    ToggleNode,
    /// Add a file into the selected folder.
    AddFile,
    /// Add a folder into the selected folder.
    AddFolder,
    /// Add a file at the top level.
    AddRootFile,
    /// Add a folder at the top level.
    AddRootFolder,
    /// Start renaming the selected node.
    RenameNode,
    /// Delete the selected node and its subtree.
    DeleteNode,
    /// Toggle drawing of guide lines.
    ToggleGuides,
    /// Collapse or restore the sidebar hosting the explorer.
    ToggleSidebar,
    /// Text editing inside the active name field.
    Edit(EditAction),
    /// Custom action forwarded to the caller without internal handling.
    Custom(Custom),
}

impl<C> ExplorerAction<C> {
    /// Whether the action operates on, or moves relative to, the selected row.
    pub(crate) const fn targets_selection(&self) -> bool {
        matches!(
            self,
            Self::SelectPrev
                | Self::SelectNext
                | Self::SelectParent
                | Self::Expand
                | Self::Collapse
                | Self::ToggleNode
                | Self::AddFile
                | Self::AddFolder
                | Self::RenameNode
                | Self::DeleteNode
        )
    }
}

/// Result of handling an action or key event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExplorerEvent<Custom = ()> {
    /// The action was handled internally and state was updated.
    Handled,
    /// The action was ignored (e.g., nothing selected / nothing to do).
    Unhandled,
    /// The action is forwarded to the caller for handling.
    Action(ExplorerAction<Custom>),
}

/// Where a new node is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddTarget {
    /// Appended to the top-level list.
    Root,
    /// Appended to the children of this folder.
    Folder(NodeId),
}
