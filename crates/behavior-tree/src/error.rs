//! Errors raised while loading a tree.
//!
//! Every failure aborts the load as a whole; no partially built tree is ever
//! handed out. Runtime evaluation has no error path.

use std::path::PathBuf;

use thiserror::Error;

use crate::description::NodeKindTag;

pub type Result<T> = std::result::Result<T, BuildError>;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to read tree description {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse tree description")]
    Parse(#[from] serde_json::Error),

    #[error("tree description has no root node")]
    MissingRoot,

    #[error("tree description has more than one root node: {ids:?}")]
    DuplicateRoot { ids: Vec<String> },

    #[error("node id {id:?} appears more than once")]
    DuplicateNodeId { id: String },

    #[error("link {source_id:?} -> {target_id:?} starts at an unknown node")]
    UnknownSource { source_id: String, target_id: String },

    #[error("link {source_id:?} -> {target_id:?} points to an unknown node")]
    DanglingTarget { source_id: String, target_id: String },

    #[error("node {target_id:?} is linked from both {first:?} and {second:?}")]
    MultipleParents {
        target_id: String,
        first: String,
        second: String,
    },

    #[error("root node {id:?} cannot be the target of a link")]
    RootHasParent { id: String },

    #[error("link cycle detected through node {id:?}")]
    Cycle { id: String },

    #[error("node {id:?} sits {depth} links deep, past the configured maximum")]
    TooDeep { id: String, depth: usize },

    #[error("{kind} node {id:?} uses output slot {slot:?} more than once")]
    DuplicateSlot {
        id: String,
        kind: NodeKindTag,
        slot: String,
    },

    #[error("{kind} node {id:?} has output slot {slot:?}, expected a 1-based ordinal")]
    InvalidSlot {
        id: String,
        kind: NodeKindTag,
        slot: String,
    },

    #[error("{kind} node {id:?} is missing output slot {expected}")]
    MissingSlot {
        id: String,
        kind: NodeKindTag,
        expected: usize,
    },

    #[error("{kind} node {id:?} accepts at most one child, found {count}")]
    TooManyChildren {
        id: String,
        kind: NodeKindTag,
        count: usize,
    },

    #[error("{kind} node {id:?} is a leaf and cannot have children")]
    LeafWithChildren { id: String, kind: NodeKindTag },

    #[error("node {id:?} is not reachable from the root")]
    Unreachable { id: String },

    #[error("action node {node:?} uses unknown action tag {tag:?}")]
    UnknownActionTag { node: String, tag: String },

    #[error("conditional node {node:?} uses unknown condition tag {tag:?}")]
    UnknownConditionTag { node: String, tag: String },

    #[error("action tag {tag} on node {node:?} has no binding")]
    UnboundAction { node: String, tag: String },

    #[error("condition tag {tag} on node {node:?} has no binding")]
    UnboundCondition { node: String, tag: String },

    #[error("bindings are incomplete: actions {actions:?}, conditions {conditions:?}")]
    IncompleteBindings {
        actions: Vec<String>,
        conditions: Vec<String>,
    },
}
