//! Conversion between `StrategyGraph` and the persisted document.
//!
//! The derived header cache is stripped on the way out and never set on the
//! way in; the next resolution pass rebuilds it.

use super::document::{DocumentEdge, DocumentNode, StrategyDocument};
use crate::error::PersistenceError;
use crate::graph::{Edge, Node, NodeData, SOURCE_NODE_ID, StrategyGraph, source_node};
use ahash::AHashSet;
use serde_json::Value;

pub fn serialize(graph: &StrategyGraph) -> StrategyDocument {
    let nodes = graph
        .nodes
        .iter()
        .map(|node| DocumentNode {
            id: node.id.clone(),
            kind: node.kind,
            position: node.position,
            data: node.data.fields().clone(),
            deletable: Some(node.deletable),
        })
        .collect();

    let edges = graph
        .edges
        .iter()
        .map(|edge| DocumentEdge {
            id: edge.id.clone(),
            source: edge.source.clone(),
            source_handle: edge.source_handle.clone(),
            target: edge.target.clone(),
            target_handle: edge.target_handle.clone(),
            edge_type: edge.edge_type.clone(),
            animated: edge.animated,
        })
        .collect();

    StrategyDocument { nodes, edges }
}

/// Pretty-printed JSON text of the document.
pub fn to_json(graph: &StrategyGraph) -> Result<String, PersistenceError> {
    serde_json::to_string_pretty(&serialize(graph)).map_err(|e| PersistenceError::Json(e.to_string()))
}

pub fn from_json(text: &str) -> Result<StrategyGraph, PersistenceError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| PersistenceError::Format(format!("not valid JSON: {}", e)))?;
    deserialize(&value)
}

/// Parses a document value into a normalized graph.
pub fn deserialize(value: &Value) -> Result<StrategyGraph, PersistenceError> {
    let object = value
        .as_object()
        .ok_or_else(|| PersistenceError::Format("document is not an object".to_string()))?;
    let raw_nodes = array_field(object, "nodes")?;
    let raw_edges = array_field(object, "edges")?;

    let mut nodes = Vec::with_capacity(raw_nodes.len());
    for (index, raw) in raw_nodes.iter().enumerate() {
        let node: DocumentNode = serde_json::from_value(raw.clone())
            .map_err(|e| PersistenceError::Format(format!("node #{}: {}", index, e)))?;
        let mut restored = Node::new(
            node.id,
            node.kind,
            node.position,
            NodeData::from_fields(node.data),
        );
        restored.deletable = node.deletable.unwrap_or(true);
        nodes.push(restored);
    }

    let mut edges = Vec::with_capacity(raw_edges.len());
    for (index, raw) in raw_edges.iter().enumerate() {
        let edge: DocumentEdge = serde_json::from_value(raw.clone())
            .map_err(|e| PersistenceError::Format(format!("edge #{}: {}", index, e)))?;
        edges.push(Edge {
            id: edge.id,
            source: edge.source,
            source_handle: edge.source_handle,
            target: edge.target,
            target_handle: edge.target_handle,
            edge_type: edge.edge_type,
            animated: edge.animated,
        });
    }

    normalize(StrategyGraph { nodes, edges })
}

fn array_field<'a>(
    object: &'a serde_json::Map<String, Value>,
    key: &str,
) -> Result<&'a Vec<Value>, PersistenceError> {
    object
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| PersistenceError::Format(format!("'{}' must be an array", key)))
}

/// Re-establishes the graph invariants on an externally supplied graph.
///
/// - exactly one Source node, with the fixed id, not deletable, synthesized
///   at the front when missing
/// - unique node ids
/// - every edge endpoint exists, and edge ids are unique (first one wins)
/// - no header cache carried over
pub fn normalize(graph: StrategyGraph) -> Result<StrategyGraph, PersistenceError> {
    let mut seen = AHashSet::new();
    let mut has_source = false;
    let mut nodes = Vec::with_capacity(graph.nodes.len() + 1);

    for mut node in graph.nodes {
        if !seen.insert(node.id.clone()) {
            return Err(PersistenceError::Format(format!(
                "duplicate node id '{}'",
                node.id
            )));
        }
        if node.id == SOURCE_NODE_ID && !node.is_source() {
            return Err(PersistenceError::Format(format!(
                "node '{}' uses the reserved source id but has type '{}'",
                node.id, node.kind
            )));
        }
        if node.is_source() {
            if node.id != SOURCE_NODE_ID || has_source {
                tracing::warn!(node = %node.id, "dropping extra source node");
                continue;
            }
            has_source = true;
            node.deletable = false;
        }
        node.data.set_calculated_header(None);
        nodes.push(node);
    }

    if !has_source {
        nodes.insert(0, source_node());
    }

    let ids: AHashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let mut edge_ids = AHashSet::new();
    let mut edges = Vec::with_capacity(graph.edges.len());
    for edge in graph.edges {
        if !ids.contains(edge.source.as_str()) || !ids.contains(edge.target.as_str()) {
            tracing::warn!(edge = %edge.id, "dropping edge with a missing endpoint");
        } else if !edge_ids.insert(edge.id.clone()) {
            tracing::warn!(edge = %edge.id, "dropping edge with a duplicate id");
        } else {
            edges.push(edge);
        }
    }

    Ok(StrategyGraph { nodes, edges })
}
