//! Decorator behaviors.
//!
//! Decorators wrap at most one child and pass its result through
//! ([`root`]) or modify it ([`inverter`]). A missing child is not an error:
//! both fall back to `Success`.

use crate::{ActionQueue, Behavior, Node, Status};

/// Delegates to the single child and returns its result unchanged.
pub(crate) fn root(children: &mut [Node], queue: &mut ActionQueue) -> Status {
    match children.first_mut() {
        Some(child) => child.on_update(queue),
        None => Status::Success,
    }
}

/// Inverts the result of its child.
///
/// # Semantics
///
/// - If the child returns `Success`, the inverter returns `Failure`
/// - If the child returns `Failure`, the inverter returns `Success`
/// - With no child, or any other child result, the inverter returns `Success`
///
/// This is analogous to a logical NOT (!) operation.
pub(crate) fn inverter(children: &mut [Node], queue: &mut ActionQueue) -> Status {
    let status = children
        .first_mut()
        .map_or(Status::Inactive, |child| child.on_update(queue));

    match status {
        Status::Success => Status::Failure,
        _ => Status::Success,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::action_fn;
    use crate::leaf::{ActionLeaf, ConditionalLeaf};

    fn literal(id: &str, value: bool) -> Node {
        Node::conditional(id, ConditionalLeaf::literal(value, true))
    }

    #[test]
    fn inverter_inverts_success() {
        let mut inverter = Node::inverter("i", Some(literal("c", true)));
        let mut queue = ActionQueue::new();

        assert_eq!(inverter.on_update(&mut queue), Status::Failure);
    }

    #[test]
    fn inverter_inverts_failure() {
        let mut inverter = Node::inverter("i", Some(literal("c", false)));
        let mut queue = ActionQueue::new();

        assert_eq!(inverter.on_update(&mut queue), Status::Success);
    }

    #[test]
    fn inverter_without_child_succeeds() {
        let mut inverter = Node::inverter("i", None);
        let mut queue = ActionQueue::new();

        assert_eq!(inverter.on_update(&mut queue), Status::Success);
    }

    #[test]
    fn root_passes_child_result_through() {
        let mut queue = ActionQueue::new();

        let mut ok = Node::root("r", literal("c", true));
        assert_eq!(ok.on_update(&mut queue), Status::Success);

        let mut failing = Node::root("r", literal("c", false));
        assert_eq!(failing.on_update(&mut queue), Status::Failure);
    }

    #[test]
    fn empty_root_succeeds() {
        let mut root = Node::new("r", crate::NodeKind::Root);
        let mut queue = ActionQueue::new();

        assert_eq!(root.on_update(&mut queue), Status::Success);
    }

    #[test]
    fn inverted_action_still_queues() {
        let mut inverter = Node::inverter(
            "i",
            Some(Node::action(
                "a",
                ActionLeaf::bound("OutputLog", action_fn(|| async {})),
            )),
        );
        let mut queue = ActionQueue::new();

        // Actions always succeed, so the inverter fails, but the work is queued.
        assert_eq!(inverter.on_update(&mut queue), Status::Failure);
        assert_eq!(queue.labels(), vec!["OutputLog"]);
    }
}
