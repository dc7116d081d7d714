//! Errors raised by the knowledge tree itself.

use crate::model::tree::NodeIndex;
use thiserror::Error;

/// Structural errors of a [KnowledgeTree](crate::model::KnowledgeTree),
/// found by verification or refused by a mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Cannot allocate memory for new nodes")]
    AllocationFailure,

    #[error("Node {0} has exactly one child")]
    DegenerateNode(NodeIndex),

    #[error("Node {0} is reachable from itself")]
    CycledNode(NodeIndex),

    #[error("Node {0} is shared by more than one parent slot")]
    CommonHeir(NodeIndex),

    #[error("Index {0} does not refer to a node of this tree")]
    InvalidIndex(NodeIndex),

    #[error("Node {0} does not have the expected shape")]
    UnexpectedNode(NodeIndex),

    #[error("Label {0:?} contains '\"'")]
    InvalidLabel(String),

    #[error("Node {0} cannot be split without nesting more than {1} nodes deep")]
    DepthExceeded(NodeIndex, usize),
}
