//! The tree-state engine
//!
//! [`TreeEngine`] owns the nodes and edges of one skill tree. Every mutation
//! validates first, applies its change, recomputes lock state and weighted
//! subtree completion, and then notifies listeners.

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::data::{TreeData, FORMAT_VERSION};
use crate::error::{InvalidOperation, Result, TreeError};
use crate::events::{ListenerId, Listeners, TreeEvent};
use crate::ids::IdGenerator;
use crate::options::EngineOptions;
use crate::propagation;
use crate::tree::{
    Edge, IconData, Metadata, NodeData, NodeId, NodeStore, SubtreeProgress, Tree, TreeTraversal,
};
use crate::update::NodeUpdate;
use crate::validation;

/// Envelope name of documents produced by [`TreeEngine::subtree_data`]
pub const SUBTREE_NAME: &str = "Subtree";

/// Overall progress through a tree
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeProgress {
    /// Number of completed nodes
    pub completed_nodes: usize,
    /// Number of nodes
    pub total_nodes: usize,
    /// Unweighted completion, rounded to a whole percent
    pub percentage: u8,
    /// Weighted completion of the root subtree
    pub weighted: f64,
}

/// In-memory skill tree with prerequisite locks and weighted completion
///
/// # Example
///
/// ```
/// use skill_tree::prelude::*;
///
/// let mut engine = TreeEngine::new();
/// let root = engine.create_root("Cooking").unwrap();
/// let child = engine.add_child_node(&root.id).unwrap();
/// assert!(engine.node(&child.id).unwrap().locked);
///
/// engine.set_completed(&root.id, true).unwrap();
/// assert!(!engine.node(&child.id).unwrap().locked);
/// assert_eq!(engine.node(&root.id).unwrap().subtree_progress, SubtreeProgress::new(5, 6));
/// ```
pub struct TreeEngine {
    store: NodeStore,
    version: String,
    name: String,
    description: Option<String>,
    metadata: Metadata,
    options: EngineOptions,
    ids: IdGenerator,
    listeners: Listeners,
}

impl TreeEngine {
    /// Create an empty engine with default options
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    /// Create an empty engine with the given options
    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            store: NodeStore::new(),
            version: FORMAT_VERSION.to_string(),
            name: options.tree_name.clone(),
            description: None,
            metadata: Metadata::new(),
            ids: IdGenerator::new(options.id_prefix.clone()),
            options,
            listeners: Listeners::default(),
        }
    }

    /// Create an engine holding a loaded document
    pub fn from_tree_data(data: TreeData, options: EngineOptions) -> Result<Self> {
        let mut engine = Self::with_options(options);
        engine.load_tree(data)?;
        Ok(engine)
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Document-level metadata carried through load and save
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    // ---------------------------------------------------------------------
    // Listeners
    // ---------------------------------------------------------------------

    /// Register a listener called after every applied mutation
    pub fn subscribe(&mut self, listener: impl FnMut(&TreeEvent) + Send + 'static) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    /// Remove a listener, returning false if it was not registered
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn emit(&mut self, event: TreeEvent) {
        trace!("emitting {}", event);
        self.listeners.emit(&event);
    }

    // ---------------------------------------------------------------------
    // Creation
    // ---------------------------------------------------------------------

    /// Build a node record without inserting it
    ///
    /// The id is fresh and unused in this tree. Children start locked behind
    /// their parent; an explicit icon wins over the configured root icon.
    pub fn create_node(
        &self,
        label: impl Into<String>,
        parent_id: Option<&NodeId>,
        icon_data: Option<IconData>,
    ) -> NodeData {
        let id = self.ids.next_unused(|id| self.store.contains(id));
        let mut node = NodeData::new(id, label, parent_id.cloned());
        if node.is_root() {
            node.weight = self.options.root_weight;
            node.icon_data = icon_data.or_else(|| self.options.root_icon.clone());
        } else {
            node.weight = self.options.child_weight;
            node.icon_data = icon_data;
        }
        node
    }

    /// Insert the root of an empty tree
    pub fn create_root(&mut self, label: impl Into<String>) -> Result<NodeData> {
        if let Some(root) = self.store.root() {
            debug!("refusing second root, tree already rooted at {}", root);
            return Err(InvalidOperation::RootExists.into());
        }
        let node = self.create_node(label, None, None);
        let id = node.id.clone();
        self.store.insert(node);
        self.recalculate();
        debug!("created root {}", id);
        self.emit(TreeEvent::NodeAdded {
            node: id.clone(),
            parent: None,
        });
        self.snapshot(&id)
    }

    /// Clear the tree and start over with a fresh root
    ///
    /// An empty label falls back to the configured root label.
    pub fn new_tree(&mut self, root_label: &str) -> Result<NodeData> {
        self.clear();
        let label = if root_label.is_empty() {
            self.options.root_label.clone()
        } else {
            root_label.to_string()
        };
        self.create_root(label)
    }

    /// Remove every node and edge, keeping the document envelope
    pub fn clear(&mut self) {
        let count = self.store.len();
        self.store.clear();
        debug!("cleared {} nodes", count);
        self.emit(TreeEvent::TreeCleared);
    }

    /// Add a child with the default label under `parent_id`
    pub fn add_child_node(&mut self, parent_id: &NodeId) -> Result<NodeData> {
        let label = self.options.child_label.clone();
        self.add_child_node_with_label(parent_id, label)
    }

    /// Add a child under `parent_id`
    ///
    /// The child inherits the parent's icon and starts locked until the
    /// parent is completed.
    pub fn add_child_node_with_label(
        &mut self,
        parent_id: &NodeId,
        label: impl Into<String>,
    ) -> Result<NodeData> {
        let parent = self
            .store
            .get(parent_id)
            .ok_or_else(|| TreeError::NotFound(parent_id.clone()))?;
        let inherited = parent.icon_data.clone();

        let node = self.create_node(label, Some(parent_id), inherited);
        let id = node.id.clone();
        self.store.insert(node);
        self.recalculate();

        debug!("added node {} under {}", id, parent_id);
        self.emit(TreeEvent::NodeAdded {
            node: id.clone(),
            parent: Some(parent_id.clone()),
        });
        self.snapshot(&id)
    }

    // ---------------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------------

    /// Delete a node together with its whole subtree
    ///
    /// Returns the removed ids; deleting an unknown id removes nothing.
    pub fn delete_node(&mut self, id: &NodeId) -> Vec<NodeId> {
        if !self.store.contains(id) {
            trace!("delete of unknown node {} ignored", id);
            return Vec::new();
        }

        let mut doomed: HashSet<NodeId> = self.store.descendants(id).into_iter().collect();
        doomed.insert(id.clone());
        let removed = self.store.remove(&doomed);
        self.recalculate();

        debug!("deleted {} and {} descendants", id, removed.len().saturating_sub(1));
        self.emit(TreeEvent::NodesRemoved {
            nodes: removed.clone(),
        });
        removed
    }

    /// Apply a partial update to a node
    ///
    /// Nothing is written unless every check passes:
    ///
    /// - new prerequisites must exist and must not include the node itself
    /// - with the completion gate on, a header node cannot become completed,
    ///   and neither can a node with an incomplete prerequisite that is not a
    ///   header
    ///
    /// Setting `is_header` forces `completed` off. A changed icon color
    /// cascades to every descendant. Returns the updated node.
    pub fn update_node(&mut self, id: &NodeId, update: NodeUpdate) -> Result<NodeData> {
        let node = self
            .store
            .get(id)
            .ok_or_else(|| TreeError::NotFound(id.clone()))?;

        if let Some(prerequisites) = &update.prerequisites {
            for prerequisite in prerequisites {
                if prerequisite == id {
                    return Err(InvalidOperation::SelfPrerequisite.into());
                }
                if !self.store.contains(prerequisite) {
                    return Err(TreeError::NotFound(prerequisite.clone()));
                }
            }
        }

        let completing = update.completed == Some(true) && !node.completed;
        if completing && self.options.enforce_completion_gate {
            if update.is_header.unwrap_or(node.is_header) {
                return Err(InvalidOperation::HeaderNotCompletable.into());
            }
            let prerequisites = update.prerequisites.as_ref().unwrap_or(&node.prerequisites);
            if !propagation::prerequisites_cleared(&self.store, prerequisites) {
                return Err(InvalidOperation::Locked.into());
            }
        }

        let was_completed = node.completed;
        let old_color = node.icon_data.as_ref().and_then(|icon| icon.color.clone());
        let recalculate = update.affects_progress();
        let cascade_color = match &update.icon_data {
            Some(Some(icon)) => icon
                .color
                .clone()
                .filter(|color| Some(color) != old_color.as_ref()),
            _ => None,
        };

        let Some(node) = self.store.get_mut(id) else {
            return Err(TreeError::NotFound(id.clone()));
        };
        let NodeUpdate {
            label,
            description,
            completed,
            icon_data,
            weight,
            is_header,
            metadata,
            prerequisites,
        } = update;
        if let Some(label) = label {
            node.label = label;
        }
        if let Some(description) = description {
            node.description = description;
        }
        if let Some(completed) = completed {
            node.completed = completed;
        }
        if let Some(icon_data) = icon_data {
            node.icon_data = icon_data;
        }
        if let Some(weight) = weight {
            node.weight = weight;
        }
        if let Some(is_header) = is_header {
            node.is_header = is_header;
        }
        if node.is_header {
            node.completed = false;
        }
        if let Some(metadata) = metadata {
            node.metadata = metadata;
        }
        if let Some(prerequisites) = prerequisites {
            node.prerequisites = prerequisites;
        }
        let now_completed = node.completed;

        if let Some(color) = cascade_color {
            self.cascade_color(id, &color);
        }
        if recalculate {
            self.recalculate();
        }

        debug!("updated node {}", id);
        self.emit(TreeEvent::NodeUpdated { node: id.clone() });
        if was_completed != now_completed {
            self.emit(TreeEvent::CompletionChanged {
                node: id.clone(),
                completed: now_completed,
            });
        }
        self.snapshot(id)
    }

    fn cascade_color(&mut self, id: &NodeId, color: &str) {
        let descendants = self.store.descendants(id);
        for descendant in &descendants {
            if let Some(node) = self.store.get_mut(descendant) {
                node.icon_data
                    .get_or_insert_with(|| IconData::emoji(""))
                    .color = Some(color.to_string());
            }
        }
        trace!("cascaded color {} to {} descendants", color, descendants.len());
    }

    /// Mark a node completed or not completed
    pub fn set_completed(&mut self, id: &NodeId, completed: bool) -> Result<NodeData> {
        self.update_node(id, NodeUpdate::new().completed(completed))
    }

    /// Flip a node's completion
    pub fn toggle_completion(&mut self, id: &NodeId) -> Result<NodeData> {
        let completed = self
            .store
            .get(id)
            .map(|node| node.completed)
            .ok_or_else(|| TreeError::NotFound(id.clone()))?;
        self.set_completed(id, !completed)
    }

    /// Move a node under a new parent
    ///
    /// Fails without changes when either id is unknown, when a node would
    /// become its own parent, or when the new parent lies in the node's own
    /// subtree. The moved node's prerequisites are reset to the new parent.
    pub fn reparent_node(&mut self, id: &NodeId, new_parent_id: &NodeId) -> Result<()> {
        let node = self
            .store
            .get(id)
            .ok_or_else(|| TreeError::NotFound(id.clone()))?;
        if !self.store.contains(new_parent_id) {
            return Err(TreeError::NotFound(new_parent_id.clone()));
        }
        if id == new_parent_id {
            return Err(InvalidOperation::SelfParent.into());
        }
        if self.store.is_ancestor_of(id, new_parent_id) {
            debug!("refusing to move {} under its descendant {}", id, new_parent_id);
            return Err(InvalidOperation::Cycle.into());
        }
        if node.parent_id.as_ref() == Some(new_parent_id) {
            trace!("{} already under {}", id, new_parent_id);
            return Ok(());
        }

        let old_parent = node.parent_id.clone();
        self.store.set_parent(id, new_parent_id);
        self.recalculate();

        debug!("moved {} under {}", id, new_parent_id);
        self.emit(TreeEvent::NodeReparented {
            node: id.clone(),
            old_parent,
            new_parent: new_parent_id.clone(),
        });
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Derived state
    // ---------------------------------------------------------------------

    fn recalculate(&mut self) {
        self.recalculate_all_lock_states();
        self.update_all_subtree_completions();
    }

    /// Recompute `locked` for every node from its direct prerequisites
    pub fn recalculate_all_lock_states(&mut self) {
        let locks: Vec<bool> = self
            .store
            .nodes()
            .iter()
            .map(|node| !propagation::prerequisites_met(&self.store, node))
            .collect();
        for (node, locked) in self.store.nodes_mut().iter_mut().zip(locks) {
            node.locked = locked;
        }
        trace!("recalculated lock state of {} nodes", self.store.len());
    }

    /// Recompute `subtree_progress` and `subtree_completion` for every node
    pub fn update_all_subtree_completions(&mut self) {
        let totals = propagation::all_subtree_progress(&self.store);
        for node in self.store.nodes_mut() {
            let progress = totals
                .get(&node.id)
                .copied()
                .unwrap_or_else(|| node.own_progress());
            node.subtree_progress = progress;
            node.subtree_completion = progress.fraction();
        }
        trace!("recalculated completion of {} nodes", self.store.len());
    }

    /// Weighted progress of the subtree rooted at `id`, computed fresh
    pub fn calculate_subtree_completion(&self, id: &NodeId) -> Result<SubtreeProgress> {
        propagation::subtree_progress(&self.store, id)
            .ok_or_else(|| TreeError::NotFound(id.clone()))
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn node(&self, id: &NodeId) -> Option<&NodeData> {
        self.store.get(id)
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> &[NodeData] {
        self.store.nodes()
    }

    /// All structural edges in insertion order
    pub fn edges(&self) -> &[Edge] {
        self.store.edges()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Every node below `id`, breadth-first; empty for unknown ids
    pub fn all_descendants(&self, id: &NodeId) -> Vec<NodeId> {
        self.store.descendants(id)
    }

    /// Every node above `id`, closest first; empty for the root or unknown ids
    pub fn all_ancestors(&self, id: &NodeId) -> Vec<NodeId> {
        self.store.ancestors(id)
    }

    /// Completed and total node counts plus the root's weighted completion
    pub fn progress(&self) -> TreeProgress {
        let total_nodes = self.store.len();
        let completed_nodes = self.store.nodes().iter().filter(|n| n.completed).count();
        let percentage = if total_nodes == 0 {
            0
        } else {
            (completed_nodes as f64 / total_nodes as f64 * 100.0).round() as u8
        };
        let weighted = self
            .store
            .root()
            .and_then(|root| self.store.get(root))
            .map(|root| root.subtree_completion)
            .unwrap_or(0.0);

        TreeProgress {
            completed_nodes,
            total_nodes,
            percentage,
            weighted,
        }
    }

    fn snapshot(&self, id: &NodeId) -> Result<NodeData> {
        self.store
            .get(id)
            .cloned()
            .ok_or_else(|| TreeError::NotFound(id.clone()))
    }

    // ---------------------------------------------------------------------
    // Serialization
    // ---------------------------------------------------------------------

    /// Serialize the whole tree, preserving node and edge order
    pub fn tree_data(&self) -> TreeData {
        TreeData {
            version: self.version.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            metadata: self.metadata.clone(),
            ..TreeData::from_parts(
                "",
                self.store.nodes().iter().cloned(),
                self.store.edges().iter().cloned(),
            )
        }
    }

    /// Extract a node, its descendants and the edges between them
    ///
    /// Node records are copied as they are, so the subtree root keeps its
    /// `parent_id`.
    pub fn subtree_data(&self, id: &NodeId) -> Result<TreeData> {
        if !self.store.contains(id) {
            return Err(TreeError::NotFound(id.clone()));
        }
        let mut members: HashSet<NodeId> = self.store.descendants(id).into_iter().collect();
        members.insert(id.clone());

        let nodes = self
            .store
            .nodes()
            .iter()
            .filter(|node| members.contains(&node.id))
            .cloned();
        let edges = self
            .store
            .edges()
            .iter()
            .filter(|edge| members.contains(&edge.source) && members.contains(&edge.target))
            .cloned();

        Ok(TreeData {
            version: self.version.clone(),
            ..TreeData::from_parts(SUBTREE_NAME, nodes, edges)
        })
    }

    /// Replace the whole tree with a document
    ///
    /// The document is validated before anything changes. Lock state and
    /// completion are always recomputed rather than read from the document.
    pub fn load_tree(&mut self, mut data: TreeData) -> Result<()> {
        let version = std::mem::take(&mut data.version);
        let name = std::mem::take(&mut data.name);
        let description = data.description.take();
        let metadata = std::mem::take(&mut data.metadata);
        let (nodes, edges) = validation::prepare(data)?;

        self.store = NodeStore::from_parts(nodes, edges);
        self.version = version;
        self.name = name;
        self.description = description;
        self.metadata = metadata;
        self.recalculate();

        debug!(
            "loaded tree {:?} with {} nodes and {} edges",
            self.name,
            self.store.len(),
            self.store.edges().len()
        );
        let nodes = self.store.len();
        self.emit(TreeEvent::TreeLoaded { nodes });
        Ok(())
    }
}

impl Default for TreeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree for TreeEngine {
    fn root(&self) -> Option<&NodeId> {
        self.store.root()
    }

    fn get(&self, id: &NodeId) -> Option<&NodeData> {
        self.store.get(id)
    }

    fn children(&self, id: &NodeId) -> Box<dyn Iterator<Item = &NodeId> + '_> {
        self.store.children(id)
    }

    fn node_count(&self) -> usize {
        self.store.len()
    }
}

impl fmt::Debug for TreeEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeEngine")
            .field("name", &self.name)
            .field("nodes", &self.store.len())
            .field("edges", &self.store.edges().len())
            .field("listeners", &self.listeners)
            .finish()
    }
}
