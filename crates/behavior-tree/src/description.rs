//! Serialized tree description.
//!
//! This is the only artifact crossing the boundary from the editor and asset
//! layer: a flat list of node records plus directed link records. Loading it
//! into a live tree is the job of [`crate::builder`].
//!
//! Wire format (JSON, camelCase):
//!
//! ```json
//! {
//!   "nodes": [
//!     { "id": "root", "nodeKind": "Root", "position": { "x": 0.0, "y": 0.0 } },
//!     { "id": "seq", "nodeKind": "Sequence" },
//!     { "id": "log", "nodeKind": "Action", "act": "OutputLog" }
//!   ],
//!   "links": [
//!     { "sourceId": "root", "outputSlot": "Output", "targetId": "seq" },
//!     { "sourceId": "seq", "outputSlot": "1", "targetId": "log" }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumDiscriminants};

use crate::error::{BuildError, Result};
use crate::tag::NONE_LABEL;

/// Flat node and link records making up one tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeDescription {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub links: Vec<LinkRecord>,
}

impl TreeDescription {
    pub fn new(nodes: Vec<NodeRecord>, links: Vec<LinkRecord>) -> Self {
        Self { nodes, links }
    }

    /// Parses a JSON description.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON description from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| BuildError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Records whose kind is `Root`.
    pub fn roots(&self) -> impl Iterator<Item = &NodeRecord> {
        self.nodes
            .iter()
            .filter(|record| record.kind_tag() == NodeKindTag::Root)
    }

    pub fn node(&self, id: &str) -> Option<&NodeRecord> {
        self.nodes.iter().find(|record| record.id == id)
    }

    /// Links leaving `id`, in record order.
    pub fn links_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a LinkRecord> {
        self.links.iter().filter(move |link| link.source_id == id)
    }
}

/// One serialized node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    /// Stable identifier, unique within one description.
    pub id: String,

    /// `nodeKind` tag plus the kind-specific payload.
    #[serde(flatten)]
    pub kind: NodeKindRecord,

    /// Editor placement; ignored by the engine.
    #[serde(default)]
    pub position: Position,
}

impl NodeRecord {
    pub fn new(id: impl Into<String>, kind: NodeKindRecord) -> Self {
        Self {
            id: id.into(),
            kind,
            position: Position::default(),
        }
    }

    pub fn kind_tag(&self) -> NodeKindTag {
        NodeKindTag::from(&self.kind)
    }
}

/// Node kind with its payload.
///
/// The editor's legacy kind names (`RootNode`, `ActionNode`, ...) are
/// accepted on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, EnumDiscriminants)]
#[strum_discriminants(name(NodeKindTag), derive(Hash, Display))]
#[serde(tag = "nodeKind")]
pub enum NodeKindRecord {
    #[serde(alias = "RootNode")]
    Root,

    #[serde(alias = "ActionNode")]
    Action {
        #[serde(default = "none_label")]
        act: String,
    },

    #[serde(alias = "ConditionalNode")]
    Conditional {
        #[serde(default = "none_label")]
        condition: String,
        #[serde(default = "default_expected")]
        expected: bool,
    },

    #[serde(alias = "SequenceNode")]
    Sequence,

    #[serde(alias = "SelectorNode")]
    Selector,

    #[serde(alias = "RepeaterNode", rename_all = "camelCase")]
    Repeater {
        #[serde(default)]
        repeat_count: u32,
    },

    #[serde(alias = "InverterNode")]
    Inverter,
}

impl NodeKindTag {
    /// Multi-child composites whose children are ordered by output slot.
    pub fn is_composite(self) -> bool {
        matches!(self, NodeKindTag::Sequence | NodeKindTag::Selector)
    }

    pub fn is_leaf(self) -> bool {
        matches!(self, NodeKindTag::Action | NodeKindTag::Conditional)
    }

    /// Kinds with at most one child.
    pub fn is_single_child(self) -> bool {
        matches!(
            self,
            NodeKindTag::Root | NodeKindTag::Repeater | NodeKindTag::Inverter
        )
    }
}

fn none_label() -> String {
    NONE_LABEL.to_string()
}

fn default_expected() -> bool {
    true
}

/// 2-D editor placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// One directed parent-to-child link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    pub source_id: String,
    /// Output port label on the source. Composites use `"1"`, `"2"`, ...
    pub output_slot: String,
    pub target_id: String,
}

impl LinkRecord {
    pub fn new(
        source_id: impl Into<String>,
        output_slot: impl Into<String>,
        target_id: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            output_slot: output_slot.into(),
            target_id: target_id.into(),
        }
    }
}
