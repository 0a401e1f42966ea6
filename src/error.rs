use thiserror::Error;

use crate::model::NodeId;

/// User-input failures raised by the explorer.
///
/// None of these are faults: the state stays consistent and the caller decides whether
/// to surface the message (the key handler shows it as a blocking notice).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExplorerError {
    #[error("Name cannot be empty.")]
    EmptyName,
    #[error("Select a folder to add into.")]
    NoFolderTarget,
    #[error("No item is being edited.")]
    NoEditSession,
    #[error("Select an item first.")]
    NoSelection,
    #[error("No more item ids are available.")]
    IdsExhausted,
    #[error("File {0} cannot contain items.")]
    FileWithChildren(NodeId),
    #[error("Item id {0} is used more than once.")]
    DuplicateId(NodeId),
    #[error("Item {0} no longer exists.")]
    MissingNode(NodeId),
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
