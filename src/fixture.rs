use crate::forest::Forest;
use crate::model::{Node, NodeId};

/// The forest the explorer starts from.
pub fn seed_forest() -> Forest {
    Forest::from_nodes([
        Node::folder(
            NodeId(1),
            "public",
            false,
            [
                Node::file(NodeId(2), "index.html"),
                Node::file(NodeId(3), "favicon.ico"),
            ],
        ),
        Node::folder(
            NodeId(4),
            "src",
            true,
            [
                Node::folder(
                    NodeId(5),
                    "components",
                    false,
                    [
                        Node::file(NodeId(6), "FileExplorer.jsx"),
                        Node::file(NodeId(7), "FileNode.jsx"),
                    ],
                ),
                Node::folder(NodeId(8), "data", false, [Node::file(NodeId(9), "initialData.js")]),
                Node::file(NodeId(10), "App.jsx"),
                Node::file(NodeId(11), "main.jsx"),
            ],
        ),
        Node::file(NodeId(12), "package.json"),
        Node::file(NodeId(13), "README.md"),
    ])
}
