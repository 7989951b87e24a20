//! Structural validation of tree documents
//!
//! Every check runs before the engine state is touched, so a rejected
//! document leaves the previous tree in place.

use log::warn;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::data::TreeData;
use crate::error::ValidationError;
use crate::tree::{Edge, NodeData, NodeId};

/// Check a document against the structural rules of a skill tree
///
/// - node ids are unique
/// - every `parentId` and prerequisite names a node in the document
/// - no node is its own prerequisite
/// - a non-empty tree has exactly one root and no parent cycles
/// - every edge joins existing nodes, agrees with the target's `parentId`
///   and appears once
pub fn validate(data: &TreeData) -> Result<(), ValidationError> {
    let mut ids: HashSet<&NodeId> = HashSet::with_capacity(data.len());
    for node in data.node_data() {
        if !ids.insert(&node.id) {
            return Err(ValidationError::DuplicateId(node.id.clone()));
        }
    }

    let mut root: Option<&NodeId> = None;
    let mut children: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();
    for node in data.node_data() {
        match &node.parent_id {
            Some(parent) if !ids.contains(parent) => {
                return Err(ValidationError::MissingParent {
                    node: node.id.clone(),
                    parent: parent.clone(),
                });
            }
            Some(parent) => children.entry(parent).or_default().push(&node.id),
            None => {
                if let Some(first) = root {
                    return Err(ValidationError::MultipleRoots {
                        first: first.clone(),
                        second: node.id.clone(),
                    });
                }
                root = Some(&node.id);
            }
        }

        for prerequisite in &node.prerequisites {
            if prerequisite == &node.id {
                return Err(ValidationError::SelfPrerequisite(node.id.clone()));
            }
            if !ids.contains(prerequisite) {
                return Err(ValidationError::UnknownPrerequisite {
                    node: node.id.clone(),
                    prerequisite: prerequisite.clone(),
                });
            }
        }
    }

    if let Some(root) = root {
        check_reachable(data, root, &children)?;
    } else if !data.is_empty() {
        return Err(ValidationError::MissingRoot);
    }

    check_edges(data, &ids)
}

/// With a single root and no dangling parents, a node the root cannot reach
/// sits on a parent cycle.
fn check_reachable(
    data: &TreeData,
    root: &NodeId,
    children: &HashMap<&NodeId, Vec<&NodeId>>,
) -> Result<(), ValidationError> {
    let mut reached: HashSet<&NodeId> = HashSet::with_capacity(data.len());
    let mut queue = VecDeque::from([root]);
    while let Some(current) = queue.pop_front() {
        if reached.insert(current) {
            if let Some(kids) = children.get(current) {
                queue.extend(kids.iter().copied());
            }
        }
    }

    match data.node_data().find(|node| !reached.contains(&node.id)) {
        Some(node) => Err(ValidationError::Cycle(node.id.clone())),
        None => Ok(()),
    }
}

fn check_edges(data: &TreeData, ids: &HashSet<&NodeId>) -> Result<(), ValidationError> {
    let parents: HashMap<&NodeId, Option<&NodeId>> = data
        .node_data()
        .map(|node| (&node.id, node.parent_id.as_ref()))
        .collect();

    let mut seen: HashSet<(&NodeId, &NodeId)> = HashSet::with_capacity(data.edges.len());
    for edge in data.edge_data() {
        if !ids.contains(&edge.source) || !ids.contains(&edge.target) {
            return Err(ValidationError::UnknownEdgeEndpoint {
                source: edge.source.clone(),
                target: edge.target.clone(),
            });
        }
        if parents.get(&edge.target).copied().flatten() != Some(&edge.source) {
            return Err(ValidationError::EdgeMismatch {
                source: edge.source.clone(),
                target: edge.target.clone(),
            });
        }
        if !seen.insert((&edge.source, &edge.target)) {
            return Err(ValidationError::DuplicateEdge {
                source: edge.source.clone(),
                target: edge.target.clone(),
            });
        }
    }
    Ok(())
}

/// Validate a document and split it into normalized node and edge records
///
/// Missing edge ids are filled in, missing parent edges are synthesized and
/// header nodes are forced to not completed. Derived fields are left for the
/// engine to recompute.
pub(crate) fn prepare(data: TreeData) -> Result<(Vec<NodeData>, Vec<Edge>), ValidationError> {
    validate(&data)?;

    let mut nodes: Vec<NodeData> = data.nodes.into_iter().map(|element| element.data).collect();
    let mut edges: Vec<Edge> = data.edges.into_iter().map(|element| element.data).collect();

    for edge in &mut edges {
        if edge.id.is_empty() {
            edge.id = Edge::conventional_id(&edge.source, &edge.target);
            warn!("assigned missing edge id {}", edge.id);
        }
    }

    let linked: HashSet<NodeId> = edges.iter().map(|edge| edge.target.clone()).collect();
    for node in &mut nodes {
        if node.is_header {
            node.completed = false;
        }
        if let Some(parent) = &node.parent_id {
            if !linked.contains(&node.id) {
                warn!("synthesized missing edge {} -> {}", parent, node.id);
                edges.push(Edge::new(parent.clone(), node.id.clone()));
            }
        }
    }

    Ok((nodes, edges))
}
