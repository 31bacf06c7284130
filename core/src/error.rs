use thiserror::Error;

use crate::node::NodeId;

/// Errors from building or querying a [`Grid`](crate::Grid).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("node {0} is not in the grid")]
    UnknownNode(NodeId),

    #[error("grid is full ({0} nodes)")]
    Full(usize),
}

/// Errors from walking parent backlinks after a search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("node {0} is not in the grid")]
    UnknownNode(NodeId),

    /// The walk hit a node that no search worker ever claimed.
    #[error("node {0} was never reached")]
    Unreached(NodeId),

    /// The walk ran more steps than the grid has nodes without hitting the start.
    #[error("parent chain from {goal} does not lead back to {start}")]
    Cycle { start: NodeId, goal: NodeId },
}

pub type GridResult<T> = Result<T, GridError>;
