//! Pending actions discovered during one tick.
//!
//! Action leaves never run their work while the tree is being evaluated. They
//! append it here, and the executor drains the list afterwards in discovery
//! order.

use std::fmt;

use crate::bindings::ActionFn;
use crate::node::NodeIndex;

/// One queued action.
#[derive(Clone)]
pub struct PendingAction {
    /// Node that queued the action.
    pub node: NodeIndex,
    /// Tag label of the bound action, for diagnostics.
    pub label: String,
    pub action: ActionFn,
}

impl PendingAction {
    /// Starts the bound work.
    pub async fn run(&self) {
        (self.action)().await;
    }
}

impl fmt::Debug for PendingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingAction")
            .field("node", &self.node)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Ordered list of actions queued by the current tick.
#[derive(Debug, Clone, Default)]
pub struct ActionQueue {
    pending: Vec<PendingAction>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: NodeIndex, label: &str, action: ActionFn) {
        self.pending.push(PendingAction {
            node,
            label: label.to_string(),
            action,
        });
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingAction> {
        self.pending.iter()
    }

    /// Tag labels in discovery order.
    pub fn labels(&self) -> Vec<&str> {
        self.pending.iter().map(|p| p.label.as_str()).collect()
    }

    /// Copies the queued actions out for draining, leaving the queue intact
    /// for inspection until the next tick clears it.
    pub fn snapshot(&self) -> Vec<PendingAction> {
        self.pending.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::action_fn;

    #[test]
    fn keeps_discovery_order() {
        let mut queue = ActionQueue::new();
        queue.push(NodeIndex(3), "MoveLeft", action_fn(|| async {}));
        queue.push(NodeIndex(1), "Wait", action_fn(|| async {}));

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.labels(), vec!["MoveLeft", "Wait"]);
        assert_eq!(queue.snapshot()[1].node, NodeIndex(1));

        queue.clear();
        assert!(queue.is_empty());
    }
}
