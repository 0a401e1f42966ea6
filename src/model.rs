use std::fmt;
use std::rc::Rc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use crate::error::ExplorerError;

/// Identifier of a node, unique across the whole forest.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a node is a file or a folder.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    File,
    Folder,
}

impl NodeKind {
    #[inline]
    pub const fn is_folder(self) -> bool {
        matches!(self, Self::Folder)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::File => "File",
            Self::Folder => "Folder",
        })
    }
}

/// A file or folder entry.
///
/// Fields are private so that the invariants hold for every value:
/// - files never carry children and are never open;
/// - children are shared through `Rc`, so cloning a node is shallow.
///
/// Deserialization checks the same rules: a file with children is rejected and a
/// file marked open is loaded closed.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawNode"))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    id: NodeId,
    name: String,
    kind: NodeKind,
    is_open: bool,
    is_editing: bool,
    children: Vec<Rc<Self>>,
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawNode {
    id: NodeId,
    name: String,
    kind: NodeKind,
    #[serde(default)]
    is_open: bool,
    #[serde(default)]
    is_editing: bool,
    #[serde(default)]
    children: Vec<Rc<Node>>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawNode> for Node {
    type Error = ExplorerError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let is_folder = raw.kind.is_folder();
        if !is_folder && !raw.children.is_empty() {
            return Err(ExplorerError::FileWithChildren(raw.id));
        }
        Ok(Self {
            id: raw.id,
            name: raw.name,
            kind: raw.kind,
            is_open: raw.is_open && is_folder,
            is_editing: raw.is_editing,
            children: raw.children,
        })
    }
}

impl Node {
    /// Creates a named, closed, childless node.
    pub fn new(id: NodeId, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            is_open: false,
            is_editing: false,
            children: Vec::new(),
        }
    }

    /// Creates a named file.
    pub fn file(id: NodeId, name: impl Into<String>) -> Self {
        Self::new(id, name, NodeKind::File)
    }

    /// Creates a named folder with the given children.
    pub fn folder(
        id: NodeId,
        name: impl Into<String>,
        is_open: bool,
        children: impl IntoIterator<Item = Self>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind: NodeKind::Folder,
            is_open,
            is_editing: false,
            children: children.into_iter().map(Rc::new).collect(),
        }
    }

    /// Creates the unnamed node produced by an "add" action: empty name, in edit mode,
    /// and (for folders) open.
    pub fn pending(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            name: String::new(),
            kind,
            is_open: kind.is_folder(),
            is_editing: true,
            children: Vec::new(),
        }
    }

    #[inline]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    #[inline]
    pub const fn is_folder(&self) -> bool {
        self.kind.is_folder()
    }

    /// Expansion flag; always `false` for files.
    #[inline]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    #[inline]
    pub const fn is_editing(&self) -> bool {
        self.is_editing
    }

    #[inline]
    pub fn children(&self) -> &[Rc<Self>] {
        &self.children
    }

    /// Returns a copy with a new name.
    #[must_use]
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Returns a copy with the given expansion flag (ignored for files).
    #[must_use]
    pub fn with_open(&self, is_open: bool) -> Self {
        Self {
            is_open: is_open && self.is_folder(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_editing(&self, is_editing: bool) -> Self {
        Self {
            is_editing,
            ..self.clone()
        }
    }

    /// Returns a copy with the children replaced. Files stay childless.
    pub(crate) fn with_children(&self, children: Vec<Rc<Self>>) -> Self {
        if !self.is_folder() {
            return self.clone();
        }
        Self {
            children,
            ..self.clone()
        }
    }

    /// Returns a copy with `child` appended and the folder forced open.
    pub(crate) fn with_appended_child(&self, child: Rc<Self>) -> Self {
        if !self.is_folder() {
            return self.clone();
        }
        let mut children = Vec::with_capacity(self.children.len() + 1);
        children.extend(self.children.iter().cloned());
        children.push(child);
        Self {
            is_open: true,
            children,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_cannot_be_opened_or_given_children() {
        let file = Node::file(NodeId(1), "a.txt");
        assert!(!file.with_open(true).is_open());

        let child = Rc::new(Node::file(NodeId(2), "b.txt"));
        assert!(file.with_children(vec![child]).children().is_empty());
    }

    #[test]
    fn pending_node_starts_unnamed_and_editing() {
        let folder = Node::pending(NodeId(7), NodeKind::Folder);
        assert_eq!(folder.name(), "");
        assert!(folder.is_editing());
        assert!(folder.is_open());

        let file = Node::pending(NodeId(8), NodeKind::File);
        assert!(!file.is_open());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_rejects_file_with_children() {
        let json = r#"{"id":1,"name":"a.txt","kind":"file","is_open":true,
            "children":[{"id":2,"name":"b.txt","kind":"file"}]}"#;
        let err = serde_json::from_str::<Node>(json).map(|_| ()).map_err(|e| e.to_string());
        assert!(err.is_err_and(|msg| msg.contains("File 1 cannot contain items.")));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_loads_open_file_closed() {
        let json = r#"{"id":1,"name":"a.txt","kind":"file","is_open":true}"#;
        let node = serde_json::from_str::<Node>(json);
        assert!(node.is_ok_and(|node| !node.is_open() && node.children().is_empty()));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serialized_node_loads_back_equal() {
        let folder = Node::folder(NodeId(1), "src", true, [Node::file(NodeId(2), "main.rs")]);
        let json = serde_json::to_string(&folder).unwrap_or_default();
        let loaded = serde_json::from_str::<Node>(&json).ok();
        assert_eq!(loaded, Some(folder));
    }

    #[test]
    fn kind_display_is_capitalised() {
        assert_eq!(NodeKind::Folder.to_string(), "Folder");
        assert_eq!(NodeKind::File.to_string(), "File");
    }
}
