//! Error types returned by the tree engine

use derive_more::Display;

use crate::tree::NodeId;

/// Result alias used throughout the engine
pub type Result<T, E = TreeError> = std::result::Result<T, E>;

/// Errors reported by [`TreeEngine`](crate::TreeEngine) operations
///
/// Every failing operation reports before touching the tree, so an `Err`
/// always means nothing changed.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum TreeError {
    /// The operation referenced a node id that is not in the tree
    #[display(fmt = "node not found: {}", _0)]
    NotFound(NodeId),

    /// The operation would break a structural rule of the tree
    #[display(fmt = "invalid operation: {}", _0)]
    InvalidOperation(InvalidOperation),

    /// A tree document or patch failed validation
    #[display(fmt = "invalid tree data: {}", _0)]
    Validation(ValidationError),
}

impl std::error::Error for TreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TreeError::Validation(reason) => Some(reason),
            _ => None,
        }
    }
}

impl From<InvalidOperation> for TreeError {
    fn from(reason: InvalidOperation) -> Self {
        TreeError::InvalidOperation(reason)
    }
}

impl From<ValidationError> for TreeError {
    fn from(reason: ValidationError) -> Self {
        TreeError::Validation(reason)
    }
}

/// Why a mutation was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum InvalidOperation {
    #[display(fmt = "cannot parent a node to itself")]
    SelfParent,
    #[display(fmt = "cannot move a node under its own descendant")]
    Cycle,
    #[display(fmt = "tree already has a root")]
    RootExists,
    #[display(fmt = "node is locked until its prerequisites are completed")]
    Locked,
    #[display(fmt = "header nodes cannot be completed")]
    HeaderNotCompletable,
    #[display(fmt = "a node cannot be its own prerequisite")]
    SelfPrerequisite,
}

/// Why a tree document was rejected
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ValidationError {
    /// The document does not have the expected shape
    #[display(fmt = "malformed document: {}", _0)]
    Malformed(String),

    #[display(fmt = "duplicate node id {}", _0)]
    DuplicateId(NodeId),

    #[display(fmt = "node {} references missing parent {}", node, parent)]
    MissingParent { node: NodeId, parent: NodeId },

    #[display(fmt = "node {} references missing prerequisite {}", node, prerequisite)]
    UnknownPrerequisite { node: NodeId, prerequisite: NodeId },

    #[display(fmt = "node {} lists itself as a prerequisite", _0)]
    SelfPrerequisite(NodeId),

    #[display(fmt = "tree has nodes but no root")]
    MissingRoot,

    #[display(fmt = "tree has more than one root ({} and {})", first, second)]
    MultipleRoots { first: NodeId, second: NodeId },

    /// A parent chain loops back on itself
    #[display(fmt = "node {} is part of a parent cycle", _0)]
    Cycle(NodeId),

    #[display(fmt = "edge {} -> {} references a node that does not exist", source, target)]
    UnknownEdgeEndpoint { source: NodeId, target: NodeId },

    #[display(fmt = "edge {} -> {} disagrees with the parent of {}", source, target, target)]
    EdgeMismatch { source: NodeId, target: NodeId },

    #[display(fmt = "edge {} -> {} appears more than once", source, target)]
    DuplicateEdge { source: NodeId, target: NodeId },
}

impl std::error::Error for ValidationError {}
