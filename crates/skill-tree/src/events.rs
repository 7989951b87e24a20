//! Change notifications
//!
//! Listeners registered on a [`TreeEngine`](crate::TreeEngine) receive a
//! [`TreeEvent`] after each mutation, once lock state and completion have
//! been recomputed.

use derive_more::Display;
use std::fmt;

use crate::tree::NodeId;

/// A change applied to the tree
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum TreeEvent {
    #[display(fmt = "node {} added", node)]
    NodeAdded {
        node: NodeId,
        parent: Option<NodeId>,
    },

    /// A node and its subtree were deleted
    #[display(fmt = "{} nodes removed", "nodes.len()")]
    NodesRemoved { nodes: Vec<NodeId> },

    #[display(fmt = "node {} updated", node)]
    NodeUpdated { node: NodeId },

    /// Emitted in addition to `NodeUpdated` when `completed` flips
    #[display(fmt = "node {} completed: {}", node, completed)]
    CompletionChanged { node: NodeId, completed: bool },

    #[display(fmt = "node {} moved under {}", node, new_parent)]
    NodeReparented {
        node: NodeId,
        old_parent: Option<NodeId>,
        new_parent: NodeId,
    },

    /// The whole tree was replaced by a loaded document
    #[display(fmt = "tree loaded with {} nodes", nodes)]
    TreeLoaded { nodes: usize },

    #[display(fmt = "tree cleared")]
    TreeCleared,
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&TreeEvent) + Send>;

/// Registered listeners, notified in registration order
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Listener)>,
}

impl Listeners {
    pub fn subscribe(&mut self, listener: impl FnMut(&TreeEvent) + Send + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub fn emit(&mut self, event: &TreeEvent) {
        for (_, listener) in &mut self.entries {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.len())
            .finish()
    }
}
