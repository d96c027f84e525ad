//! The strategy graph data model.
//!
//! - `Node` / `NodeData`: a typed node and its open configuration map
//! - `Edge` / `Connection`: stored edges and proposed connections
//! - `NodeKind` + `behavior`: the per-kind lookup table (handles, labels, operands)
//! - `IdAllocator`, `LayoutHeuristic`: id and position proposals for new nodes

pub mod behavior;
pub mod edge;
pub mod ids;
pub mod kind;
pub mod layout;
pub mod node;
pub mod params;

pub use behavior::{NodeBehavior, behavior, display_label};
pub use edge::{Connection, DEFAULT_EDGE_TYPE, Edge};
pub use ids::IdAllocator;
pub use kind::NodeKind;
pub use layout::LayoutHeuristic;
pub use node::{CALCULATED_HEADER_FIELD, Node, NodeData, Position};

use serde_json::{Map, json};

/// Fixed id of the single market-data Source node.
pub const SOURCE_NODE_ID: &str = "price";

/// Where the Source node sits when it has to be synthesized.
pub const SOURCE_NODE_POSITION: Position = Position::new(50.0, 150.0);

/// The Source node as it exists in a fresh graph.
pub fn source_node() -> Node {
    let mut fields = Map::new();
    fields.insert("label".to_string(), json!("Market Data"));
    let mut node = Node::new(
        SOURCE_NODE_ID,
        NodeKind::Source,
        SOURCE_NODE_POSITION,
        NodeData::from_fields(fields),
    );
    node.deletable = false;
    node
}

/// A snapshot of nodes and edges, both kept in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StrategyGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl StrategyGraph {
    /// A graph holding only the Source node.
    pub fn new() -> Self {
        Self {
            nodes: vec![source_node()],
            edges: Vec::new(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn source(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.is_source())
    }

    /// The edge feeding `handle` of `node_id`. With several candidates the last one wins.
    pub fn incoming(&self, node_id: &str, handle: &str) -> Option<&Edge> {
        self.edges
            .iter()
            .rev()
            .find(|e| e.binds_input(node_id, handle))
    }

    /// The derived header of a node, if it has one.
    pub fn header_of(&self, id: &str) -> Option<&str> {
        self.node(id).and_then(|n| n.data.calculated_header())
    }

    /// Header value for display purposes, keyed by node id.
    pub fn headers(&self) -> Vec<(&str, Option<&str>)> {
        self.nodes
            .iter()
            .map(|n| (n.id.as_str(), n.data.calculated_header()))
            .collect()
    }
}
