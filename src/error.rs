use crate::graph::NodeKind;
use itertools::Itertools;
use thiserror::Error;

/// Why a proposed connection was turned away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeRejection {
    MissingSourceNode,
    MissingTargetNode,
    UnknownSourceHandle,
    UnknownTargetHandle,
    InputOccupied,
}

impl std::fmt::Display for EdgeRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            EdgeRejection::MissingSourceNode => "source node does not exist",
            EdgeRejection::MissingTargetNode => "target node does not exist",
            EdgeRejection::UnknownSourceHandle => "source handle is not exposed by the source node",
            EdgeRejection::UnknownTargetHandle => "target handle is not exposed by the target node",
            EdgeRejection::InputOccupied => "target input is already connected",
        };
        f.write_str(message)
    }
}

/// Errors raised by `GraphStore` mutations.
///
/// Every variant leaves the current graph untouched. Collaborators are free to
/// ignore `InvalidEdge` and `ProtectedNode`; they are normal guards, not failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error(
        "Connection from '{source_node_id}:{source_handle}' to '{target_node_id}:{target_handle}' is invalid: {reason}"
    )]
    InvalidEdge {
        source_node_id: String,
        source_handle: String,
        target_node_id: String,
        target_handle: String,
        reason: EdgeRejection,
    },

    #[error("Node '{0}' is protected and cannot be removed")]
    ProtectedNode(String),

    #[error("Node '{0}' not found")]
    NodeNotFound(String),

    #[error("A graph holds exactly one '{0}' node; another cannot be created")]
    SingletonKind(NodeKind),

    #[error("No unused '{0}' node id is left")]
    IdsExhausted(NodeKind),

    #[error("Edge '{0}' not found")]
    EdgeNotFound(String),

    #[error("Field '{field}' on node '{node_id}' expects a number, but received '{raw}'")]
    NumericParse {
        node_id: String,
        field: String,
        raw: String,
    },
}

/// Errors from the persistence boundary (document codec and key-value stores).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersistenceError {
    #[error("Invalid strategy format: {0}")]
    Format(String),

    #[error("No saved strategy found under key '{0}'")]
    NotFound(String),

    #[error("Failed to encode strategy document: {0}")]
    Json(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised by a `KeyValueStore` backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Store I/O failed: {0}")]
    Io(String),

    #[error("Store contents could not be decoded: {0}")]
    Encoding(String),
}

/// Non-fatal warning: the label fixed point was not reached within the pass bound.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Labels did not stabilize after {passes} passes; still changing: {}",
    .node_ids.iter().join(", ")
)]
pub struct LabelingUnstable {
    pub passes: usize,
    pub node_ids: Vec<String>,
}
