//! A rooted tree of live nodes.
//!
//! [`Tree`] owns the root [`Node`] (and through it, every descendant). It
//! exposes one tick's evaluation and end-of-tick reset separately so the
//! executor can drain actions between them, plus read-only diagnostics.

use std::fmt::Write as _;

use crate::description::{LinkRecord, NodeRecord, TreeDescription};
use crate::node::{Iter, NodeIndex};
use crate::{ActionQueue, Behavior, Node, Status};

#[derive(Debug, Clone)]
pub struct Tree {
    root: Node,
    len: usize,
}

impl Tree {
    /// Takes ownership of a node hierarchy, assigns pre-order indexes and
    /// parent back-references, and awakens every node once.
    pub fn from_root(mut root: Node) -> Self {
        let mut len = 0;
        root.reindex(None, &mut len);
        root.awaken_subtree();
        Self { root, len }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn node_count(&self) -> usize {
        self.len
    }

    /// Updates the root once. Bound actions reached during the walk are
    /// appended to `queue`; nothing runs yet.
    pub fn evaluate(&mut self, queue: &mut ActionQueue) -> Status {
        self.root.on_update(queue)
    }

    /// Resets every node to `Inactive`, children before parents.
    pub fn end(&mut self) {
        self.root.end_subtree();
    }

    /// All nodes, pre-order.
    pub fn iter(&self) -> Iter<'_> {
        self.root.iter()
    }

    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.0 >= self.len {
            return None;
        }
        self.iter().find(|node| node.index() == index)
    }

    /// Looks a node up by its stable id.
    pub fn find(&self, id: &str) -> Option<&Node> {
        self.iter().find(|node| node.id() == id)
    }

    pub fn state_of(&self, id: &str) -> Option<Status> {
        self.find(id).map(Behavior::state)
    }

    pub fn parent_of(&self, node: &Node) -> Option<&Node> {
        node.parent().and_then(|index| self.get(index))
    }

    /// Ids from the root down to `id`, following parent back-references.
    pub fn path_to(&self, id: &str) -> Option<Vec<&str>> {
        let mut current = self.find(id)?;
        let mut path = vec![current.id()];
        while let Some(parent) = self.parent_of(current) {
            path.push(parent.id());
            current = parent;
        }
        path.reverse();
        Some(path)
    }

    /// Indented outline of the tree, one node per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        render_node(&self.root, 0, &mut out);
        out
    }

    /// Re-derives the serialized form of this tree. Placement is not kept and
    /// comes back as the origin.
    pub fn to_description(&self) -> TreeDescription {
        let mut nodes = Vec::with_capacity(self.len);
        let mut links = Vec::with_capacity(self.len.saturating_sub(1));

        for node in self.iter() {
            nodes.push(NodeRecord::new(node.id(), node.kind().to_record()));
            for child in node.children() {
                links.push(LinkRecord::new(
                    node.id(),
                    child.slot().unwrap_or_default(),
                    child.id(),
                ));
            }
        }

        TreeDescription::new(nodes, links)
    }
}

fn render_node(node: &Node, depth: usize, out: &mut String) {
    let _ = write!(out, "{:indent$}{} {}", "", node.kind().tag(), node.id(), indent = depth * 2);
    match node.kind() {
        crate::NodeKind::Action(leaf) => {
            let _ = write!(out, " act={}", leaf.label());
        }
        crate::NodeKind::Conditional(leaf) => {
            let _ = write!(out, " condition={} expected={}", leaf.label(), leaf.expected());
        }
        crate::NodeKind::Repeater { repeat_count } => {
            let _ = write!(out, " x{}", repeat_count);
        }
        _ => {}
    }
    let _ = writeln!(out, " [{}]", node.state());

    for child in node.children() {
        render_node(child, depth + 1, out);
    }
}
