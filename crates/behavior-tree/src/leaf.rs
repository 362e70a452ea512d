//! Leaf behaviors: actions and conditionals.
//!
//! Leaves never own children. Actions hand their bound work to the tick's
//! [`ActionQueue`] and succeed immediately; conditionals answer on the spot.

use std::fmt;
use std::sync::Arc;

use crate::bindings::{ActionFn, ConditionFn};
use crate::node::NodeIndex;
use crate::tag::{FALSE_LABEL, NONE_LABEL, TRUE_LABEL};
use crate::{ActionQueue, Status};

/// Action leaf with an optional bound action.
#[derive(Clone)]
pub struct ActionLeaf {
    label: String,
    action: Option<ActionFn>,
}

impl ActionLeaf {
    /// An action leaf tagged `None`: succeeds and queues nothing.
    pub fn none() -> Self {
        Self {
            label: NONE_LABEL.to_string(),
            action: None,
        }
    }

    pub fn bound(label: impl Into<String>, action: ActionFn) -> Self {
        Self {
            label: label.into(),
            action: Some(action),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_bound(&self) -> bool {
        self.action.is_some()
    }

    /// Queues the bound action, if any. Never waits for it.
    pub(crate) fn update(&self, node: NodeIndex, queue: &mut ActionQueue) -> Status {
        if let Some(action) = &self.action {
            queue.push(node, &self.label, Arc::clone(action));
        }
        Status::Success
    }
}

impl fmt::Debug for ActionLeaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionLeaf")
            .field("label", &self.label)
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// How a conditional produces its boolean.
#[derive(Clone)]
pub enum Check {
    /// Tagged `None`: always fails.
    Unset,
    /// `True`/`False` literal; no external function involved.
    Literal(bool),
    Predicate(ConditionFn),
}

/// Conditional leaf comparing a boolean against an expected value.
#[derive(Clone)]
pub struct ConditionalLeaf {
    label: String,
    expected: bool,
    check: Check,
}

impl ConditionalLeaf {
    pub fn unset(expected: bool) -> Self {
        Self {
            label: NONE_LABEL.to_string(),
            expected,
            check: Check::Unset,
        }
    }

    pub fn literal(value: bool, expected: bool) -> Self {
        let label = if value { TRUE_LABEL } else { FALSE_LABEL };
        Self {
            label: label.to_string(),
            expected,
            check: Check::Literal(value),
        }
    }

    pub fn predicate(label: impl Into<String>, expected: bool, predicate: ConditionFn) -> Self {
        Self {
            label: label.into(),
            expected,
            check: Check::Predicate(predicate),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn expected(&self) -> bool {
        self.expected
    }

    pub fn check(&self) -> &Check {
        &self.check
    }

    pub(crate) fn update(&self) -> Status {
        match &self.check {
            Check::Unset => Status::Failure,
            Check::Literal(value) => Status::from_bool(*value == self.expected),
            Check::Predicate(predicate) => Status::from_bool(predicate() == self.expected),
        }
    }
}

impl fmt::Debug for ConditionalLeaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let check = match &self.check {
            Check::Unset => "unset",
            Check::Literal(_) => "literal",
            Check::Predicate(_) => "predicate",
        };
        f.debug_struct("ConditionalLeaf")
            .field("label", &self.label)
            .field("expected", &self.expected)
            .field("check", &check)
            .finish()
    }
}
