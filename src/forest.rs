use std::rc::Rc;

#[cfg(feature = "serde")]
use rustc_hash::FxHashSet;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use crate::error::ExplorerError;

use crate::model::{Node, NodeId};

/// Ordered sequence of top-level nodes.
///
/// Every mutation returns a new `Forest`; the receiver is left untouched. Only the
/// nodes on the path to the change are rebuilt, all other subtrees are shared with the
/// previous value through `Rc`.
///
/// Deserialized forests must have pairwise distinct ids.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<Rc<Node>>", into = "Vec<Rc<Node>>")
)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Forest {
    roots: Vec<Rc<Node>>,
}

impl From<Forest> for Vec<Rc<Node>> {
    fn from(forest: Forest) -> Self {
        forest.roots
    }
}

#[cfg(feature = "serde")]
impl TryFrom<Vec<Rc<Node>>> for Forest {
    type Error = ExplorerError;

    fn try_from(roots: Vec<Rc<Node>>) -> Result<Self, Self::Error> {
        let forest = Self { roots };
        let mut seen = FxHashSet::default();
        match forest.ids().into_iter().find(|id| !seen.insert(*id)) {
            Some(id) => Err(ExplorerError::DuplicateId(id)),
            None => Ok(forest),
        }
    }
}

impl Forest {
    /// Creates an empty forest.
    pub const fn new() -> Self {
        Self { roots: Vec::new() }
    }

    /// Builds a forest from top-level nodes.
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
        Self {
            roots: nodes.into_iter().map(Rc::new).collect(),
        }
    }

    #[inline]
    pub fn roots(&self) -> &[Rc<Node>] {
        &self.roots
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes at every depth.
    pub fn len(&self) -> usize {
        fn count(nodes: &[Rc<Node>]) -> usize {
            nodes.iter().map(|node| 1 + count(node.children())).sum()
        }
        count(&self.roots)
    }

    /// Node ids in pre-order.
    pub fn ids(&self) -> Vec<NodeId> {
        fn collect(nodes: &[Rc<Node>], out: &mut Vec<NodeId>) {
            for node in nodes {
                out.push(node.id());
                collect(node.children(), out);
            }
        }
        let mut out = Vec::new();
        collect(&self.roots, &mut out);
        out
    }

    /// Depth-first search; returns the first match in pre-order.
    pub fn find(&self, id: NodeId) -> Option<&Rc<Node>> {
        find_in(&self.roots, id)
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.find(id).is_some()
    }

    /// Returns the chain of nodes from a root down to `id` (inclusive).
    pub fn path_to(&self, id: NodeId) -> Option<Vec<Rc<Node>>> {
        let mut path = Vec::new();
        path_in(&self.roots, id, &mut path).then_some(path)
    }

    /// Replaces the node `id` with `transform(node)`.
    ///
    /// Unknown ids return an equal forest sharing every root.
    #[must_use]
    pub fn update<F>(&self, id: NodeId, transform: F) -> Self
    where
        F: FnOnce(&Node) -> Node,
    {
        let mut transform = Some(transform);
        update_in(&self.roots, id, &mut transform).map_or_else(
            || self.clone(),
            |roots| Self { roots },
        )
    }

    /// Appends `child` to the folder `parent` and forces that folder open.
    ///
    /// If `parent` is missing or is a file the forest is returned unchanged.
    #[must_use]
    pub fn insert_child(&self, parent: NodeId, child: Node) -> Self {
        match self.find(parent) {
            Some(node) if node.is_folder() => {
                let child = Rc::new(child);
                self.update(parent, |node| node.with_appended_child(child))
            }
            _ => self.clone(),
        }
    }

    /// Appends a top-level node.
    #[must_use]
    pub fn insert_root(&self, node: Node) -> Self {
        let mut roots = Vec::with_capacity(self.roots.len() + 1);
        roots.extend(self.roots.iter().cloned());
        roots.push(Rc::new(node));
        Self { roots }
    }

    /// Removes the node `id` (and its whole subtree) wherever it occurs.
    #[must_use]
    pub fn delete(&self, id: NodeId) -> Self {
        delete_in(&self.roots, id).map_or_else(|| self.clone(), |roots| Self { roots })
    }
}

fn find_in(nodes: &[Rc<Node>], id: NodeId) -> Option<&Rc<Node>> {
    for node in nodes {
        if node.id() == id {
            return Some(node);
        }
        if let Some(found) = find_in(node.children(), id) {
            return Some(found);
        }
    }
    None
}

fn path_in(nodes: &[Rc<Node>], id: NodeId, path: &mut Vec<Rc<Node>>) -> bool {
    for node in nodes {
        path.push(Rc::clone(node));
        if node.id() == id || path_in(node.children(), id, path) {
            return true;
        }
        path.pop();
    }
    false
}

// Returns `None` when `id` is not below `nodes`, so callers can keep sharing them.
fn update_in<F>(nodes: &[Rc<Node>], id: NodeId, transform: &mut Option<F>) -> Option<Vec<Rc<Node>>>
where
    F: FnOnce(&Node) -> Node,
{
    for (idx, node) in nodes.iter().enumerate() {
        let replacement = if node.id() == id {
            let transform = transform.take()?;
            transform(node)
        } else if let Some(children) = update_in(node.children(), id, transform) {
            node.with_children(children)
        } else {
            continue;
        };
        let mut updated = nodes.to_vec();
        updated[idx] = Rc::new(replacement);
        return Some(updated);
    }
    None
}

fn delete_in(nodes: &[Rc<Node>], id: NodeId) -> Option<Vec<Rc<Node>>> {
    for (idx, node) in nodes.iter().enumerate() {
        if node.id() == id {
            let mut updated = nodes.to_vec();
            updated.remove(idx);
            return Some(updated);
        }
        if let Some(children) = delete_in(node.children(), id) {
            let mut updated = nodes.to_vec();
            updated[idx] = Rc::new(node.with_children(children));
            return Some(updated);
        }
    }
    None
}
