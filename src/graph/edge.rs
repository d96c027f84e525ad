use serde::{Deserialize, Serialize};

/// Rendering type assigned to every edge created through `GraphStore::connect`.
pub const DEFAULT_EDGE_TYPE: &str = "customEdge";

/// A directed connection from an output handle to an input handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub source_handle: String,
    pub target: String,
    pub target_handle: String,
    pub edge_type: String,
    pub animated: bool,
}

impl Edge {
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    pub fn binds_input(&self, node_id: &str, handle: &str) -> bool {
        self.target == node_id && self.target_handle == handle
    }
}

/// A proposed edge as emitted by the canvas when the user draws a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    pub source_handle: String,
    pub target: String,
    pub target_handle: String,
}

impl Connection {
    pub fn new(source: &str, source_handle: &str, target: &str, target_handle: &str) -> Self {
        Self {
            id: None,
            source: source.to_string(),
            source_handle: source_handle.to_string(),
            target: target.to_string(),
            target_handle: target_handle.to_string(),
        }
    }

    /// The id this connection gets as an edge, following the canvas naming scheme.
    pub fn edge_id(&self) -> String {
        self.id.clone().unwrap_or_else(|| {
            format!(
                "reactflow__edge-{}{}-{}{}",
                self.source, self.source_handle, self.target, self.target_handle
            )
        })
    }

    pub(crate) fn into_edge(self) -> Edge {
        Edge {
            id: self.edge_id(),
            source: self.source,
            source_handle: self.source_handle,
            target: self.target,
            target_handle: self.target_handle,
            edge_type: DEFAULT_EDGE_TYPE.to_string(),
            animated: false,
        }
    }
}
