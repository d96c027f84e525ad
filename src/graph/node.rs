use super::kind::NodeKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the derived header field as the canvas knows it.
pub const CALCULATED_HEADER_FIELD: &str = "calculatedHeader";

/// A point on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Configuration of a node plus its derived header cache.
///
/// The configuration is an open field map so the canvas can carry fields this
/// crate does not interpret; typed views live in `graph::params`. The header
/// cache is kept outside of that map and can therefore never be persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeData {
    fields: Map<String, Value>,
    calculated_header: Option<String>,
}

impl NodeData {
    /// Builds node data from raw fields, dropping unset values and any header cache.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        let mut data = Self::default();
        data.merge(fields);
        data
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// A string field, treating blank text as unset.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// A numeric field. Strings, NaN and infinities count as unset.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.fields
            .get(key)
            .and_then(Value::as_f64)
            .filter(|n| n.is_finite())
    }

    /// The user-supplied label override, if any.
    pub fn label(&self) -> Option<&str> {
        self.text("label")
    }

    pub fn calculated_header(&self) -> Option<&str> {
        self.calculated_header.as_deref()
    }

    pub(crate) fn set_calculated_header(&mut self, header: Option<String>) {
        self.calculated_header = header;
    }

    /// Shallow-merges `partial` into the fields.
    ///
    /// `null` and blank strings unset the field so default labels re-engage.
    /// The header cache is never written through here.
    pub fn merge(&mut self, partial: Map<String, Value>) {
        for (key, value) in partial {
            if key == CALCULATED_HEADER_FIELD {
                continue;
            }
            if is_unset(&value) {
                self.fields.remove(&key);
            } else {
                self.fields.insert(key, value);
            }
        }
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        let mut partial = Map::new();
        partial.insert(key.to_string(), value);
        self.merge(partial);
    }
}

fn is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// A typed unit of the strategy graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub data: NodeData,
    pub position: Position,
    pub deletable: bool,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind, position: Position, data: NodeData) -> Self {
        Self {
            id: id.into(),
            kind,
            data,
            position,
            deletable: true,
        }
    }

    pub fn is_source(&self) -> bool {
        self.kind == NodeKind::Source
    }
}
