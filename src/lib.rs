//! Editable file/folder tree explorer widget for ratatui.
//!
//! The tree is an immutable [`Forest`] of [`Node`]s; every create, rename, toggle, or
//! delete produces a new forest that shares untouched subtrees with the previous one.
//! [`ExplorerState`] owns the forest together with the selection, the inline name
//! field, and the list of visible rows, and [`ExplorerView`] renders it.
//!
//! Feature flags:
//! - `keymap` (default): crossterm-based key bindings and `ExplorerState::handle_key*`.
//! - `serde`: serde support for `Node`, `Forest`, and `ExplorerSnapshot`.
//! - `cli`: the `file-explorer` binary.

mod action;
mod announce;
mod context;
mod edit;
mod error;
pub mod fixture;
mod flatten;
mod forest;
mod glyphs;
#[cfg(feature = "keymap")]
mod keymap;
mod model;
pub mod prelude;
mod sidebar;
mod state;
mod style;
mod widget;

pub use action::{AddTarget, ExplorerAction, ExplorerEvent};
pub use announce::Announcement;
pub use context::RowContext;
pub use edit::{EditAction, EditSession};
pub use error::{ExplorerError, Result};
pub use flatten::{VisibleNode, flatten};
pub use forest::Forest;
pub use glyphs::{ExplorerGlyphs, edit_spans, label_line, name_spans};
#[cfg(feature = "keymap")]
pub use keymap::{ExplorerKeyBindings, KeymapProfile};
pub use model::{Node, NodeId, NodeKind};
pub use sidebar::{COLLAPSED_WIDTH, CollapsedRail, SidebarState};
pub use state::{ExplorerSnapshot, ExplorerState, RowHit};
pub use style::{ExplorerStyle, ScrollPolicy};
pub use widget::ExplorerView;
