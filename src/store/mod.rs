//! The authoritative graph holder.
//!
//! Every mutation works on a copy of the current snapshot, runs the label
//! resolver over it and only then swaps it in, so a rejected edit never leaves
//! a half-applied graph behind.

pub mod events;

use crate::config::{ConnectionPolicy, StoreConfig};
use crate::error::{EdgeRejection, GraphError, LabelingUnstable, PersistenceError};
use crate::graph::params::{ActionType, PositionSide};
use crate::graph::{
    Connection, IdAllocator, LayoutHeuristic, Node, NodeData, NodeKind, Position, StrategyGraph,
    behavior,
};
use crate::labels::LabelResolver;
use crate::persistence::{KeyValueStore, codec};
use serde_json::{Map, Number, Value};

pub use events::GraphEvent;

#[derive(Debug, Clone)]
pub struct GraphStore {
    graph: StrategyGraph,
    selection: Option<String>,
    ids: IdAllocator,
    layout: LayoutHeuristic,
    resolver: LabelResolver,
    config: StoreConfig,
    unstable: Option<LabelingUnstable>,
}

#[derive(Debug, Clone)]
pub struct GraphStoreBuilder {
    config: StoreConfig,
    graph: StrategyGraph,
}

impl GraphStoreBuilder {
    pub fn new() -> Self {
        Self {
            config: StoreConfig::default(),
            graph: StrategyGraph::new(),
        }
    }

    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.config.resolver.max_passes = max_passes;
        self
    }

    pub fn with_logic_headers(mut self, enabled: bool) -> Self {
        self.config.resolver.derive_logic_headers = enabled;
        self
    }

    pub fn with_connection_policy(mut self, policy: ConnectionPolicy) -> Self {
        self.config.connection_policy = policy;
        self
    }

    /// Seeds the graph with the builder's usual Long Entry / Long Exit actions.
    pub fn with_starter_actions(mut self) -> Self {
        for (id, action, y) in [
            ("entry_long_1", ActionType::Entry, 100.0),
            ("exit_long_1", ActionType::Exit, 250.0),
        ] {
            let mut fields = Map::new();
            fields.insert("actionType".to_string(), Value::from(action.code()));
            fields.insert(
                "positionType".to_string(),
                Value::from(PositionSide::Long.code()),
            );
            self.graph.nodes.push(Node::new(
                id,
                NodeKind::Action,
                Position::new(700.0, y),
                NodeData::from_fields(fields),
            ));
        }
        self
    }

    pub fn build(self) -> GraphStore {
        let mut ids = IdAllocator::new();
        for node in &self.graph.nodes {
            ids.observe(&node.id);
        }
        let mut store = GraphStore {
            graph: StrategyGraph::default(),
            selection: None,
            ids,
            layout: LayoutHeuristic::new(self.config.layout.clone()),
            resolver: LabelResolver::new(self.config.resolver.clone()),
            config: self.config,
            unstable: None,
        };
        store.commit(self.graph);
        store
    }
}

impl Default for GraphStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore {
    /// A store holding only the Source node, with default configuration.
    pub fn new() -> Self {
        GraphStoreBuilder::new().build()
    }

    /// A store seeded like a freshly opened builder canvas.
    pub fn starter() -> Self {
        GraphStoreBuilder::new().with_starter_actions().build()
    }

    pub fn builder() -> GraphStoreBuilder {
        GraphStoreBuilder::new()
    }

    pub fn snapshot(&self) -> &StrategyGraph {
        &self.graph
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// True when the last resolution hit its pass bound.
    pub fn has_unstable_labels(&self) -> bool {
        self.unstable.is_some()
    }

    pub fn labeling_warning(&self) -> Option<&LabelingUnstable> {
        self.unstable.as_ref()
    }

    /// Creates a node of `kind`, places it and selects it. Returns the new id.
    ///
    /// The Source node is unique and cannot be created. Allocated ids that are
    /// already taken by loaded nodes are skipped.
    pub fn add_node(
        &mut self,
        kind: NodeKind,
        initial_data: Map<String, Value>,
    ) -> Result<String, GraphError> {
        if kind == NodeKind::Source {
            return Err(GraphError::SingletonKind(kind));
        }
        let id = loop {
            let id = self
                .ids
                .next_id(kind)
                .ok_or(GraphError::IdsExhausted(kind))?;
            if !self.graph.contains_node(&id) {
                break id;
            }
        };
        let position = self.layout.place(&self.graph.nodes);

        let mut data = NodeData::from_fields(initial_data);
        data.insert("id", Value::from(id.clone()));

        let mut next = self.graph.clone();
        next.nodes.push(Node::new(id.clone(), kind, position, data));
        self.commit(next);

        tracing::debug!(node = %id, kind = %kind, "node added");
        self.selection = Some(id.clone());
        Ok(id)
    }

    /// Removes a node and every edge touching it. The Source node is protected.
    pub fn remove_node(&mut self, id: &str) -> Result<(), GraphError> {
        let node = self
            .graph
            .node(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;
        if node.is_source() || !node.deletable {
            return Err(GraphError::ProtectedNode(id.to_string()));
        }

        let mut next = self.graph.clone();
        next.nodes.retain(|n| n.id != id);
        next.edges.retain(|e| !e.touches(id));
        self.commit(next);

        if self.selection.as_deref() == Some(id) {
            self.selection = None;
        }
        Ok(())
    }

    /// Adds an edge after checking both endpoints and their currently exposed handles.
    pub fn connect(&mut self, candidate: Connection) -> Result<String, GraphError> {
        let reject = |reason: EdgeRejection| GraphError::InvalidEdge {
            source_node_id: candidate.source.clone(),
            source_handle: candidate.source_handle.clone(),
            target_node_id: candidate.target.clone(),
            target_handle: candidate.target_handle.clone(),
            reason,
        };

        let source = self
            .graph
            .node(&candidate.source)
            .ok_or_else(|| reject(EdgeRejection::MissingSourceNode))?;
        let target = self
            .graph
            .node(&candidate.target)
            .ok_or_else(|| reject(EdgeRejection::MissingTargetNode))?;

        if !behavior(source.kind)
            .output_handles(&source.data)
            .contains(&candidate.source_handle.as_str())
        {
            return Err(reject(EdgeRejection::UnknownSourceHandle));
        }
        if !behavior(target.kind)
            .input_handles(&target.data)
            .contains(&candidate.target_handle.as_str())
        {
            return Err(reject(EdgeRejection::UnknownTargetHandle));
        }

        let occupied = self
            .graph
            .edges
            .iter()
            .any(|e| e.binds_input(&candidate.target, &candidate.target_handle));
        if occupied && self.config.connection_policy == ConnectionPolicy::Reject {
            return Err(reject(EdgeRejection::InputOccupied));
        }

        let edge = candidate.into_edge();
        let edge_id = edge.id.clone();
        let mut next = self.graph.clone();
        next.edges
            .retain(|e| !e.binds_input(&edge.target, &edge.target_handle) && e.id != edge.id);
        next.edges.push(edge);
        self.commit(next);
        Ok(edge_id)
    }

    pub fn remove_edge(&mut self, id: &str) -> Result<(), GraphError> {
        if self.graph.edge(id).is_none() {
            return Err(GraphError::EdgeNotFound(id.to_string()));
        }
        let mut next = self.graph.clone();
        next.edges.retain(|e| e.id != id);
        self.commit(next);
        Ok(())
    }

    pub fn move_node(&mut self, id: &str, position: Position) -> Result<(), GraphError> {
        let mut next = self.graph.clone();
        let node = next
            .node_mut(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;
        node.position = position;
        self.commit(next);
        Ok(())
    }

    /// Selects an existing node, or clears the selection with `None`.
    pub fn select(&mut self, id: Option<&str>) -> Result<(), GraphError> {
        match id {
            Some(id) if !self.graph.contains_node(id) => {
                Err(GraphError::NodeNotFound(id.to_string()))
            }
            _ => {
                self.selection = id.map(str::to_string);
                Ok(())
            }
        }
    }

    /// Shallow-merges `partial` into a node's data; blank or null values unset fields.
    ///
    /// The cached header is kept until the resolution pass that follows.
    pub fn patch_node_data(
        &mut self,
        id: &str,
        partial: Map<String, Value>,
    ) -> Result<(), GraphError> {
        let mut next = self.graph.clone();
        let node = next
            .node_mut(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;
        node.data.merge(partial);
        self.commit(next);
        Ok(())
    }

    /// Applies a raw form value to one field, parsing numeric fields.
    ///
    /// Unparsable numbers are rejected and the field keeps its previous value.
    pub fn set_field(&mut self, node_id: &str, field: &str, raw: &str) -> Result<(), GraphError> {
        let node = self
            .graph
            .node(node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))?;

        let value = if raw.trim().is_empty() {
            Value::Null
        } else if behavior(node.kind).numeric_fields().contains(&field) {
            parse_number(raw).ok_or_else(|| GraphError::NumericParse {
                node_id: node_id.to_string(),
                field: field.to_string(),
                raw: raw.to_string(),
            })?
        } else {
            Value::from(raw)
        };

        let mut partial = Map::new();
        partial.insert(field.to_string(), value);
        self.patch_node_data(node_id, partial)
    }

    /// Installs a complete graph, re-asserting the Source node invariant.
    ///
    /// Fails without touching the current graph when the snapshot cannot be
    /// normalized (duplicate ids, a non-Source node on the Source id).
    pub fn replace_all(&mut self, graph: StrategyGraph) -> Result<(), PersistenceError> {
        let graph = codec::normalize(graph)?;
        for node in &graph.nodes {
            self.ids.observe(&node.id);
        }
        self.commit(graph);
        self.selection = None;
        Ok(())
    }

    /// Writes the current graph under the configured storage key.
    pub fn save_to(&self, store: &mut dyn KeyValueStore) -> Result<(), PersistenceError> {
        let document = codec::to_json(&self.graph)?;
        store.set(&self.config.storage_key, &document)?;
        tracing::info!(
            key = %self.config.storage_key,
            nodes = self.graph.nodes.len(),
            edges = self.graph.edges.len(),
            "strategy saved"
        );
        Ok(())
    }

    /// Replaces the current graph with the one stored under the configured key.
    ///
    /// On any failure the in-memory graph is left exactly as it was.
    pub fn load_from(&mut self, store: &dyn KeyValueStore) -> Result<(), PersistenceError> {
        let key = &self.config.storage_key;
        let document = store
            .get(key)?
            .ok_or_else(|| PersistenceError::NotFound(key.clone()))?;
        let graph = codec::from_json(&document)?;
        tracing::info!(
            key = %key,
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "strategy loaded"
        );
        self.replace_all(graph)
    }

    fn commit(&mut self, mut next: StrategyGraph) {
        let resolution = self.resolver.resolve(&mut next);
        if !resolution.updated.is_empty() {
            tracing::debug!(
                passes = resolution.passes,
                updated = resolution.updated.len(),
                "headers resolved"
            );
        }
        self.unstable = resolution.unstable;
        self.graph = next;
    }
}

/// Parses a form value as a finite number, keeping integral values integral.
fn parse_number(raw: &str) -> Option<Value> {
    let n: f64 = raw.trim().parse().ok()?;
    if !n.is_finite() {
        return None;
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        Some(Value::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number)
    }
}
