//! Composite behaviors.
//!
//! Composites aggregate the results of their children, which are ticked in
//! output-slot order: [`sequence`] (AND logic), [`selector`] (OR logic) and
//! [`repeater`] (AND over repeated updates of a single child).

use crate::{ActionQueue, Behavior, Node, Status};

/// Updates children in order until one fails.
///
/// # Semantics
///
/// - If a child returns `Failure`, the sequence **stops immediately** and returns `Failure`
/// - Any other child result moves on to the next child
/// - If no child fails, the sequence returns `Success` (also when it has no children)
///
/// This is analogous to a short-circuited logical AND (&&) operation.
pub(crate) fn sequence(children: &mut [Node], queue: &mut ActionQueue) -> Status {
    for child in children {
        if child.on_update(queue) == Status::Failure {
            return Status::Failure; // Short-circuit
        }
    }
    Status::Success
}

/// Updates children in order until one succeeds.
///
/// # Semantics
///
/// - A selector without children returns `Success`
/// - If a child returns `Success`, the selector **stops immediately** and returns `Success`
/// - If no child succeeds, the selector returns `Failure`
///
/// This is analogous to a short-circuited logical OR (||) operation.
pub(crate) fn selector(children: &mut [Node], queue: &mut ActionQueue) -> Status {
    if children.is_empty() {
        return Status::Success;
    }

    for child in children {
        if child.on_update(queue) == Status::Success {
            return Status::Success; // Short-circuit
        }
    }
    Status::Failure
}

/// Updates the single child exactly `repeat_count` times and ANDs the results.
///
/// There is no short-circuit: a failing repetition still lets the remaining
/// ones run. Zero repetitions, or no child at all, yield `Success`.
pub(crate) fn repeater(
    repeat_count: u32,
    children: &mut [Node],
    queue: &mut ActionQueue,
) -> Status {
    let mut all_succeeded = true;

    if let Some(child) = children.first_mut() {
        for _ in 0..repeat_count {
            all_succeeded &= child.on_update(queue) == Status::Success;
        }
    }

    Status::from_bool(all_succeeded)
}
