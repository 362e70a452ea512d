//! Builds a live [`Tree`] from a [`TreeDescription`].
//!
//! Loading runs in two phases. The whole description is validated first
//! (ids, root, links, cycles, depth, per-kind shape, reachability), then the
//! tree is constructed top-down from the root while resolving action and condition
//! tags against the host's [`Bindings`]. Either phase failing aborts the load;
//! no partial tree is returned.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::bindings::Bindings;
use crate::config::TreeConfig;
use crate::description::{LinkRecord, NodeKindRecord, NodeRecord, TreeDescription};
use crate::error::{BuildError, Result};
use crate::leaf::{ActionLeaf, ConditionalLeaf};
use crate::tag::{ActTag, ConditionTag, Tag};
use crate::tree::Tree;
use crate::{Node, NodeKind};

/// Builds a tree with the default [`TreeConfig`].
pub fn build<A: Tag, C: Tag>(
    description: &TreeDescription,
    bindings: &Bindings<A, C>,
) -> Result<Tree> {
    build_with(description, bindings, &TreeConfig::default())
}

/// Validates `description` and builds an awakened tree from it.
pub fn build_with<A: Tag, C: Tag>(
    description: &TreeDescription,
    bindings: &Bindings<A, C>,
    config: &TreeConfig,
) -> Result<Tree> {
    let graph = Graph::validate(description, config)?;
    let root = graph.build_node(graph.root, bindings)?;
    let tree = Tree::from_root(root);

    debug!(
        agent = %config.agent,
        nodes = tree.node_count(),
        skipped = description.nodes.len() - tree.node_count(),
        "built behavior tree"
    );
    Ok(tree)
}

/// Validated view over a description, borrowing its records.
struct Graph<'a> {
    records: HashMap<&'a str, &'a NodeRecord>,
    /// Outgoing links per source, already in child order.
    children: HashMap<&'a str, Vec<&'a LinkRecord>>,
    root: &'a NodeRecord,
}

impl<'a> Graph<'a> {
    fn validate(description: &'a TreeDescription, config: &TreeConfig) -> Result<Self> {
        let records = index_records(description)?;
        let root = find_root(description)?;
        let parents = index_parents(description, &records, root)?;
        check_depths(&parents, config.max_depth)?;

        let mut outgoing: HashMap<&str, Vec<&LinkRecord>> = HashMap::new();
        for link in &description.links {
            outgoing.entry(link.source_id.as_str()).or_default().push(link);
        }

        let mut children = HashMap::with_capacity(outgoing.len());
        for (source, links) in outgoing {
            let record = records.get(source).ok_or_else(|| BuildError::UnknownSource {
                source_id: source.to_string(),
                target_id: links
                    .first()
                    .map(|link| link.target_id.clone())
                    .unwrap_or_default(),
            })?;
            children.insert(source, order_children(record, links)?);
        }

        let graph = Self {
            records,
            children,
            root,
        };
        graph.check_reachability(description, config)?;

        if graph.children_of(&root.id).is_empty() {
            warn!(
                agent = %config.agent,
                root = %root.id,
                "root node has no child; every tick succeeds without work"
            );
        }

        Ok(graph)
    }

    fn children_of(&self, id: &str) -> &[&'a LinkRecord] {
        self.children.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Skips, or rejects, records the root cannot reach.
    fn check_reachability(&self, description: &TreeDescription, config: &TreeConfig) -> Result<()> {
        let mut reached: HashSet<&str> = HashSet::with_capacity(self.records.len());
        let mut frontier = VecDeque::from([self.root.id.as_str()]);
        while let Some(id) = frontier.pop_front() {
            if reached.insert(id) {
                frontier.extend(self.children_of(id).iter().map(|link| link.target_id.as_str()));
            }
        }

        for record in &description.nodes {
            if reached.contains(record.id.as_str()) {
                continue;
            }
            if config.reject_unreachable {
                return Err(BuildError::Unreachable {
                    id: record.id.clone(),
                });
            }
            warn!(
                agent = %config.agent,
                node = %record.id,
                kind = %record.kind_tag(),
                "skipping node not reachable from root"
            );
        }
        Ok(())
    }

    fn build_node<A: Tag, C: Tag>(
        &self,
        record: &NodeRecord,
        bindings: &Bindings<A, C>,
    ) -> Result<Node> {
        let mut node = Node::new(record.id.clone(), bind_kind(record, bindings)?);

        for link in self.children_of(&record.id) {
            let target = self.records.get(link.target_id.as_str()).ok_or_else(|| {
                BuildError::DanglingTarget {
                    source_id: link.source_id.clone(),
                    target_id: link.target_id.clone(),
                }
            })?;
            let child = self.build_node(target, bindings)?;
            node.push_child(link.output_slot.clone(), child);
        }

        Ok(node)
    }
}

fn index_records(description: &TreeDescription) -> Result<HashMap<&str, &NodeRecord>> {
    let mut records = HashMap::with_capacity(description.nodes.len());
    for record in &description.nodes {
        if records.insert(record.id.as_str(), record).is_some() {
            return Err(BuildError::DuplicateNodeId {
                id: record.id.clone(),
            });
        }
    }
    Ok(records)
}

fn find_root(description: &TreeDescription) -> Result<&NodeRecord> {
    let roots: Vec<&NodeRecord> = description.roots().collect();
    match roots.as_slice() {
        [] => Err(BuildError::MissingRoot),
        [root] => Ok(*root),
        _ => Err(BuildError::DuplicateRoot {
            ids: roots.iter().map(|record| record.id.clone()).collect(),
        }),
    }
}

/// Maps every link target to its single source.
fn index_parents<'a>(
    description: &'a TreeDescription,
    records: &HashMap<&str, &NodeRecord>,
    root: &NodeRecord,
) -> Result<HashMap<&'a str, &'a str>> {
    let mut parents: HashMap<&str, &str> = HashMap::with_capacity(description.links.len());

    for link in &description.links {
        if !records.contains_key(link.source_id.as_str()) {
            return Err(BuildError::UnknownSource {
                source_id: link.source_id.clone(),
                target_id: link.target_id.clone(),
            });
        }
        if !records.contains_key(link.target_id.as_str()) {
            return Err(BuildError::DanglingTarget {
                source_id: link.source_id.clone(),
                target_id: link.target_id.clone(),
            });
        }
        if link.target_id == root.id {
            return Err(BuildError::RootHasParent {
                id: root.id.clone(),
            });
        }
        if let Some(first) = parents.insert(link.target_id.as_str(), link.source_id.as_str()) {
            return Err(BuildError::MultipleParents {
                target_id: link.target_id.clone(),
                first: first.to_string(),
                second: link.source_id.clone(),
            });
        }
    }

    Ok(parents)
}

/// Walks every parent chain once, without recursion, so cycles and excessive
/// depth are caught before anything recurses over the tree.
///
/// With at most one parent per node, a cycle shows up as a chain that
/// revisits a node. Depth counts links from the top of a chain, so the root
/// sits at 0.
fn check_depths(parents: &HashMap<&str, &str>, max_depth: usize) -> Result<()> {
    let mut depths: HashMap<&str, usize> = HashMap::with_capacity(parents.len() + 1);

    for &start in parents.keys() {
        let mut chain: Vec<&str> = Vec::new();
        let mut on_chain: HashSet<&str> = HashSet::new();
        let mut current = start;

        let base = loop {
            if let Some(&depth) = depths.get(current) {
                break depth;
            }
            if !on_chain.insert(current) {
                return Err(BuildError::Cycle {
                    id: current.to_string(),
                });
            }
            match parents.get(current) {
                Some(&parent) => {
                    chain.push(current);
                    current = parent;
                }
                None => {
                    depths.insert(current, 0);
                    break 0;
                }
            }
        };

        for (offset, id) in chain.into_iter().rev().enumerate() {
            let depth = base + offset + 1;
            if depth > max_depth {
                return Err(BuildError::TooDeep {
                    id: id.to_string(),
                    depth,
                });
            }
            depths.insert(id, depth);
        }
    }

    Ok(())
}

/// Checks the outgoing links of one record against its kind and returns them
/// in child order.
fn order_children<'a>(
    record: &NodeRecord,
    links: Vec<&'a LinkRecord>,
) -> Result<Vec<&'a LinkRecord>> {
    let kind = record.kind_tag();

    if kind.is_leaf() {
        return Err(BuildError::LeafWithChildren {
            id: record.id.clone(),
            kind,
        });
    }

    if kind.is_single_child() {
        if links.len() > 1 {
            return Err(BuildError::TooManyChildren {
                id: record.id.clone(),
                kind,
                count: links.len(),
            });
        }
        return Ok(links);
    }

    let mut by_slot: BTreeMap<usize, &LinkRecord> = BTreeMap::new();
    for link in links {
        let slot = parse_slot(&link.output_slot).ok_or_else(|| BuildError::InvalidSlot {
            id: record.id.clone(),
            kind,
            slot: link.output_slot.clone(),
        })?;
        if by_slot.insert(slot, link).is_some() {
            return Err(BuildError::DuplicateSlot {
                id: record.id.clone(),
                kind,
                slot: link.output_slot.clone(),
            });
        }
    }

    for (position, slot) in by_slot.keys().enumerate() {
        if *slot != position + 1 {
            return Err(BuildError::MissingSlot {
                id: record.id.clone(),
                kind,
                expected: position + 1,
            });
        }
    }

    Ok(by_slot.into_values().collect())
}

/// Canonical 1-based decimal ordinal; `"01"` and `"0"` are rejected.
fn parse_slot(slot: &str) -> Option<usize> {
    let ordinal: usize = slot.parse().ok()?;
    (ordinal >= 1 && ordinal.to_string() == slot).then_some(ordinal)
}

fn bind_kind<A: Tag, C: Tag>(record: &NodeRecord, bindings: &Bindings<A, C>) -> Result<NodeKind> {
    let kind = match &record.kind {
        NodeKindRecord::Root => NodeKind::Root,
        NodeKindRecord::Action { act } => NodeKind::Action(bind_action(&record.id, act, bindings)?),
        NodeKindRecord::Conditional {
            condition,
            expected,
        } => NodeKind::Conditional(bind_condition(&record.id, condition, *expected, bindings)?),
        NodeKindRecord::Sequence => NodeKind::Sequence,
        NodeKindRecord::Selector => NodeKind::Selector,
        NodeKindRecord::Repeater { repeat_count } => NodeKind::Repeater {
            repeat_count: *repeat_count,
        },
        NodeKindRecord::Inverter => NodeKind::Inverter,
    };
    Ok(kind)
}

fn bind_action<A: Tag, C: Tag>(
    node: &str,
    label: &str,
    bindings: &Bindings<A, C>,
) -> Result<ActionLeaf> {
    let tag = ActTag::<A>::parse(label).ok_or_else(|| BuildError::UnknownActionTag {
        node: node.to_string(),
        tag: label.to_string(),
    })?;

    match tag {
        ActTag::None => Ok(ActionLeaf::none()),
        ActTag::Bound(tag) => {
            let action = bindings
                .action_for(&tag)
                .ok_or_else(|| BuildError::UnboundAction {
                    node: node.to_string(),
                    tag: tag.to_string(),
                })?;
            Ok(ActionLeaf::bound(label, Arc::clone(action)))
        }
    }
}

fn bind_condition<A: Tag, C: Tag>(
    node: &str,
    label: &str,
    expected: bool,
    bindings: &Bindings<A, C>,
) -> Result<ConditionalLeaf> {
    let tag = ConditionTag::<C>::parse(label).ok_or_else(|| BuildError::UnknownConditionTag {
        node: node.to_string(),
        tag: label.to_string(),
    })?;

    if let Some(value) = tag.literal() {
        return Ok(ConditionalLeaf::literal(value, expected));
    }

    match tag {
        ConditionTag::Bound(tag) => {
            let predicate =
                bindings
                    .condition_for(&tag)
                    .ok_or_else(|| BuildError::UnboundCondition {
                        node: node.to_string(),
                        tag: tag.to_string(),
                    })?;
            Ok(ConditionalLeaf::predicate(label, expected, Arc::clone(predicate)))
        }
        _ => Ok(ConditionalLeaf::unset(expected)),
    }
}
