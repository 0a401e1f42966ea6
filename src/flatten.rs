use std::rc::Rc;

use smallvec::SmallVec;

use crate::forest::Forest;
use crate::model::{Node, NodeId};

/// A visible row: the node, its depth, and the data needed to draw guide lines.
#[derive(Clone, Debug)]
pub struct VisibleNode {
    pub(crate) node: Rc<Node>,
    pub(crate) depth: u16,
    pub(crate) parent: Option<NodeId>,
    // For every ancestor level: whether the node on that level is the last sibling.
    pub(crate) is_tail_stack: SmallVec<[bool; 8]>,
}

impl VisibleNode {
    #[inline]
    pub fn node(&self) -> &Rc<Node> {
        &self.node
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.node.id()
    }

    #[inline]
    pub const fn depth(&self) -> u16 {
        self.depth
    }

    #[inline]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Linearizes the forest in pre-order, descending only into open folders.
pub fn flatten(forest: &Forest) -> Vec<VisibleNode> {
    let mut out = Vec::new();
    let mut is_tail_stack: SmallVec<[bool; 8]> = SmallVec::new();
    push_visible(forest.roots(), 0, None, &mut is_tail_stack, &mut out);
    out
}

fn push_visible(
    nodes: &[Rc<Node>],
    depth: u16,
    parent: Option<NodeId>,
    is_tail_stack: &mut SmallVec<[bool; 8]>,
    out: &mut Vec<VisibleNode>,
) {
    let last = nodes.len().saturating_sub(1);
    for (idx, node) in nodes.iter().enumerate() {
        if depth > 0 {
            is_tail_stack.push(idx == last);
        }
        out.push(VisibleNode {
            node: Rc::clone(node),
            depth,
            parent,
            is_tail_stack: is_tail_stack.clone(),
        });
        if node.is_open() {
            push_visible(
                node.children(),
                depth + 1,
                Some(node.id()),
                is_tail_stack,
                out,
            );
        }
        if depth > 0 {
            is_tail_stack.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(rows: &[VisibleNode]) -> Vec<u64> {
        rows.iter().map(|row| row.id().0).collect()
    }

    #[test]
    fn closed_folder_hides_all_descendants() {
        let forest = Forest::from_nodes([
            Node::folder(
                NodeId(1),
                "src",
                false,
                [Node::folder(NodeId(2), "bin", true, [Node::file(NodeId(3), "main.rs")])],
            ),
            Node::file(NodeId(4), "Cargo.toml"),
        ]);
        assert_eq!(ids(&flatten(&forest)), vec![1, 4]);
    }

    #[test]
    fn closed_folder_inside_open_folder_hides_only_its_subtree() {
        let forest = Forest::from_nodes([
            Node::folder(
                NodeId(1),
                "src",
                true,
                [
                    Node::folder(NodeId(2), "bin", false, [Node::file(NodeId(3), "main.rs")]),
                    Node::file(NodeId(5), "lib.rs"),
                ],
            ),
            Node::file(NodeId(4), "Cargo.toml"),
        ]);
        let rows = flatten(&forest);
        assert_eq!(ids(&rows), vec![1, 2, 5, 4]);
        let depths: Vec<_> = rows.iter().map(VisibleNode::depth).collect();
        assert_eq!(depths, vec![0, 1, 1, 0]);
        assert_eq!(rows[1].parent(), Some(NodeId(1)));
        assert_eq!(rows[3].parent(), None);
    }

    #[test]
    fn tail_stack_tracks_last_siblings() {
        let forest = Forest::from_nodes([Node::folder(
            NodeId(1),
            "a",
            true,
            [
                Node::folder(NodeId(2), "b", true, [Node::file(NodeId(3), "c")]),
                Node::file(NodeId(4), "d"),
            ],
        )]);
        let rows = flatten(&forest);
        let stacks: Vec<Vec<bool>> = rows.iter().map(|r| r.is_tail_stack.to_vec()).collect();
        assert_eq!(
            stacks,
            vec![vec![], vec![false], vec![false, true], vec![true]]
        );
    }

    #[test]
    fn empty_forest_flattens_to_nothing() {
        assert!(flatten(&Forest::new()).is_empty());
    }
}
