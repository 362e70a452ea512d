//! Live tree nodes.
//!
//! A [`Node`] is a closed sum over the seven node kinds, dispatched through the
//! [`Behavior`] lifecycle. Children are owned by their parent; the parent
//! back-reference is a pre-order [`NodeIndex`] used only for diagnostics.

use std::fmt;

use crate::description::{NodeKindRecord, NodeKindTag};
use crate::leaf::{ActionLeaf, ConditionalLeaf};
use crate::{ActionQueue, Behavior, Status, composite, decorator};

/// Output slot label of single-child kinds in the editor.
pub const SINGLE_OUTPUT_SLOT: &str = "Output";

/// Pre-order position of a node within its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeIndex(pub usize);

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node kind with its bound payload.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Root,
    Action(ActionLeaf),
    Conditional(ConditionalLeaf),
    Sequence,
    Selector,
    Repeater { repeat_count: u32 },
    Inverter,
}

impl NodeKind {
    pub fn tag(&self) -> NodeKindTag {
        match self {
            NodeKind::Root => NodeKindTag::Root,
            NodeKind::Action(_) => NodeKindTag::Action,
            NodeKind::Conditional(_) => NodeKindTag::Conditional,
            NodeKind::Sequence => NodeKindTag::Sequence,
            NodeKind::Selector => NodeKindTag::Selector,
            NodeKind::Repeater { .. } => NodeKindTag::Repeater,
            NodeKind::Inverter => NodeKindTag::Inverter,
        }
    }

    /// Serialized form, with tags written back as their labels.
    pub fn to_record(&self) -> NodeKindRecord {
        match self {
            NodeKind::Root => NodeKindRecord::Root,
            NodeKind::Action(leaf) => NodeKindRecord::Action {
                act: leaf.label().to_string(),
            },
            NodeKind::Conditional(leaf) => NodeKindRecord::Conditional {
                condition: leaf.label().to_string(),
                expected: leaf.expected(),
            },
            NodeKind::Sequence => NodeKindRecord::Sequence,
            NodeKind::Selector => NodeKindRecord::Selector,
            NodeKind::Repeater { repeat_count } => NodeKindRecord::Repeater {
                repeat_count: *repeat_count,
            },
            NodeKind::Inverter => NodeKindRecord::Inverter,
        }
    }
}

/// A live behavior node.
#[derive(Debug, Clone)]
pub struct Node {
    id: String,
    index: NodeIndex,
    parent: Option<NodeIndex>,
    slot: Option<String>,
    state: Status,
    kind: NodeKind,
    children: Vec<Node>,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            index: NodeIndex::default(),
            parent: None,
            slot: None,
            state: Status::Inactive,
            kind,
            children: Vec::new(),
        }
    }

    pub fn root(id: impl Into<String>, child: Node) -> Self {
        Self::new(id, NodeKind::Root).with_child(child)
    }

    pub fn sequence(id: impl Into<String>, children: Vec<Node>) -> Self {
        Self::new(id, NodeKind::Sequence).with_children(children)
    }

    pub fn selector(id: impl Into<String>, children: Vec<Node>) -> Self {
        Self::new(id, NodeKind::Selector).with_children(children)
    }

    pub fn repeater(id: impl Into<String>, repeat_count: u32, child: Option<Node>) -> Self {
        Self::new(id, NodeKind::Repeater { repeat_count })
            .with_children(child.into_iter().collect())
    }

    pub fn inverter(id: impl Into<String>, child: Option<Node>) -> Self {
        Self::new(id, NodeKind::Inverter).with_children(child.into_iter().collect())
    }

    pub fn action(id: impl Into<String>, leaf: ActionLeaf) -> Self {
        Self::new(id, NodeKind::Action(leaf))
    }

    pub fn conditional(id: impl Into<String>, leaf: ConditionalLeaf) -> Self {
        Self::new(id, NodeKind::Conditional(leaf))
    }

    /// Appends `child` under the next default slot: `"1"`, `"2"`, ... for
    /// composites and `"Output"` for everything else.
    pub fn with_child(mut self, child: Node) -> Self {
        let slot = if self.kind.tag().is_composite() {
            (self.children.len() + 1).to_string()
        } else {
            SINGLE_OUTPUT_SLOT.to_string()
        };
        self.push_child(slot, child);
        self
    }

    pub fn with_children(self, children: Vec<Node>) -> Self {
        children.into_iter().fold(self, Node::with_child)
    }

    /// Appends `child`, recording the output slot it hangs from.
    pub fn push_child(&mut self, slot: impl Into<String>, mut child: Node) {
        child.slot = Some(slot.into());
        self.children.push(child);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// Parent position; diagnostics only.
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Output slot of the link this node hangs from; `None` for the root.
    pub fn slot(&self) -> Option<&str> {
        self.slot.as_deref()
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Nodes in this subtree, pre-order, starting with `self`.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// Assigns pre-order indexes and parent back-references below `self`.
    pub(crate) fn reindex(&mut self, parent: Option<NodeIndex>, next: &mut usize) {
        self.index = NodeIndex(*next);
        self.parent = parent;
        *next += 1;

        let index = self.index;
        for child in &mut self.children {
            child.reindex(Some(index), next);
        }
    }

    /// Awakens this subtree top-down.
    pub(crate) fn awaken_subtree(&mut self) {
        self.on_awake();
        for child in &mut self.children {
            child.awaken_subtree();
        }
    }

    /// Ends this subtree, children before their parent.
    pub(crate) fn end_subtree(&mut self) {
        for child in &mut self.children {
            child.end_subtree();
        }
        self.on_end();
    }
}

impl Behavior for Node {
    fn on_awake(&mut self) {
        self.state = Status::Inactive;
    }

    fn on_start(&mut self) {
        self.state = Status::Running;
    }

    fn on_update(&mut self, queue: &mut ActionQueue) -> Status {
        if self.state == Status::Inactive {
            self.on_start();
        }

        let index = self.index;
        let Node { kind, children, .. } = self;
        match kind {
            NodeKind::Root => decorator::root(children, queue),
            NodeKind::Action(leaf) => leaf.update(index, queue),
            NodeKind::Conditional(leaf) => leaf.update(),
            NodeKind::Sequence => composite::sequence(children, queue),
            NodeKind::Selector => composite::selector(children, queue),
            NodeKind::Repeater { repeat_count } => {
                composite::repeater(*repeat_count, children, queue)
            }
            NodeKind::Inverter => decorator::inverter(children, queue),
        }
    }

    fn on_end(&mut self) {
        self.state = Status::Inactive;
    }

    fn state(&self) -> Status {
        self.state
    }
}

/// Pre-order iterator over a subtree.
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::action_fn;

    fn leaf(id: &str) -> Node {
        Node::conditional(id, ConditionalLeaf::literal(true, true))
    }

    #[test]
    fn default_slots_follow_kind() {
        let seq = Node::sequence("s", vec![leaf("a"), leaf("b")]);
        let slots: Vec<_> = seq.children().iter().map(|c| c.slot()).collect();
        assert_eq!(slots, vec![Some("1"), Some("2")]);

        let inv = Node::inverter("i", Some(leaf("a")));
        assert_eq!(inv.children()[0].slot(), Some("Output"));
        assert_eq!(inv.slot(), None);
    }

    #[test]
    fn reindex_assigns_preorder_positions_and_parents() {
        let mut root = Node::root(
            "r",
            Node::sequence("s", vec![Node::inverter("i", Some(leaf("a"))), leaf("b")]),
        );
        let mut next = 0;
        root.reindex(None, &mut next);

        let visited: Vec<_> = root
            .iter()
            .map(|n| (n.id().to_string(), n.index().0, n.parent().map(|p| p.0)))
            .collect();
        assert_eq!(
            visited,
            vec![
                ("r".to_string(), 0, None),
                ("s".to_string(), 1, Some(0)),
                ("i".to_string(), 2, Some(1)),
                ("a".to_string(), 3, Some(2)),
                ("b".to_string(), 4, Some(1)),
            ]
        );
        assert_eq!(next, 5);
    }

    #[test]
    fn update_starts_inactive_node_and_end_resets() {
        let mut node = leaf("a");
        let mut queue = ActionQueue::new();
        assert_eq!(node.state(), Status::Inactive);

        assert_eq!(node.on_update(&mut queue), Status::Success);
        assert_eq!(node.state(), Status::Running);

        node.on_end();
        assert_eq!(node.state(), Status::Inactive);
    }

    #[test]
    fn end_subtree_resets_every_descendant() {
        let mut root = Node::root(
            "r",
            Node::sequence(
                "s",
                vec![
                    Node::action("a", ActionLeaf::bound("Wait", action_fn(|| async {}))),
                    leaf("b"),
                ],
            ),
        );
        let mut queue = ActionQueue::new();
        root.on_update(&mut queue);
        assert!(root.iter().all(|n| n.state() == Status::Running));

        root.end_subtree();
        assert!(root.iter().all(|n| n.state() == Status::Inactive));
    }

    #[test]
    fn kind_round_trips_to_record() {
        let node = Node::repeater("p", 4, None);
        assert_eq!(
            node.kind().to_record(),
            NodeKindRecord::Repeater { repeat_count: 4 }
        );
        assert_eq!(node.kind().tag(), NodeKindTag::Repeater);
    }
}
