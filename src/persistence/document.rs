use crate::graph::{NodeKind, Position};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The portable strategy document: the only persisted format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyDocument {
    pub nodes: Vec<DocumentNode>,
    pub edges: Vec<DocumentEdge>,
}

/// A persisted node. `data` never contains the derived header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub position: Position,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletable: Option<bool>,
}

/// A persisted edge with its rendering attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEdge {
    pub id: String,
    pub source: String,
    pub source_handle: String,
    pub target: String,
    pub target_handle: String,
    #[serde(rename = "type", default = "default_edge_type")]
    pub edge_type: String,
    #[serde(default)]
    pub animated: bool,
}

fn default_edge_type() -> String {
    crate::graph::DEFAULT_EDGE_TYPE.to_string()
}
