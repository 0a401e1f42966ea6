pub use crate::{
    AddTarget, Announcement, CollapsedRail, EditAction, EditSession, ExplorerAction,
    ExplorerError, ExplorerEvent, ExplorerGlyphs, ExplorerSnapshot, ExplorerState, ExplorerStyle,
    ExplorerView, Forest, Node, NodeId, NodeKind, RowContext, RowHit, ScrollPolicy, SidebarState,
    VisibleNode, flatten,
};

#[cfg(feature = "keymap")]
pub use crate::{ExplorerKeyBindings, KeymapProfile};
