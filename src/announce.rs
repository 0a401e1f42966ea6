use std::fmt;

use crate::model::NodeKind;

/// Short status message produced by every successful create, rename, or delete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Announcement {
    Created(NodeKind),
    Renamed { kind: NodeKind, name: String },
    /// Carries the deleted node's name; empty when it never had one.
    Deleted(String),
}

impl fmt::Display for Announcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created(kind) => write!(f, "{kind} created"),
            Self::Renamed { kind, name } => write!(f, "{kind} renamed to {name}"),
            Self::Deleted(name) if name.is_empty() => f.write_str("Item deleted"),
            Self::Deleted(name) => write!(f, "{name} deleted"),
        }
    }
}
