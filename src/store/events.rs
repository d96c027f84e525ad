use super::GraphStore;
use crate::error::GraphError;
use crate::graph::{Connection, NodeKind, Position};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Inbound change requests from the canvas, the node menu and the node forms.
///
/// Serialized with an `event` tag so event scripts can be stored as JSON:
/// `{ "event": "fieldChanged", "nodeId": "condition_2", "field": "threshold", "rawValue": "30" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GraphEvent {
    NodeMoved {
        id: String,
        position: Position,
    },
    NodeRemoveRequested {
        id: String,
    },
    EdgeAdded(Connection),
    EdgeRemoved {
        id: String,
    },
    SelectionChanged {
        #[serde(default)]
        id: Option<String>,
    },
    CreateRequested {
        kind: NodeKind,
        #[serde(default)]
        initial_data: Map<String, Value>,
    },
    FieldChanged {
        node_id: String,
        field: String,
        raw_value: String,
    },
}

impl GraphStore {
    /// Routes one collaborator event to the matching mutation.
    ///
    /// Guard rejections (protected node, invalid edge) are returned like any
    /// other error; the graph is unchanged in every error case.
    pub fn apply(&mut self, event: GraphEvent) -> Result<(), GraphError> {
        let result = match event {
            GraphEvent::NodeMoved { id, position } => self.move_node(&id, position),
            GraphEvent::NodeRemoveRequested { id } => self.remove_node(&id),
            GraphEvent::EdgeAdded(connection) => self.connect(connection).map(|_| ()),
            GraphEvent::EdgeRemoved { id } => self.remove_edge(&id),
            GraphEvent::SelectionChanged { id } => self.select(id.as_deref()),
            GraphEvent::CreateRequested { kind, initial_data } => {
                self.add_node(kind, initial_data).map(|_| ())
            }
            GraphEvent::FieldChanged {
                node_id,
                field,
                raw_value,
            } => self.set_field(&node_id, &field, &raw_value),
        };

        if let Err(e) = &result {
            tracing::debug!(error = %e, "event rejected");
        }
        result
    }
}
