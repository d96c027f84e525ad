//! Tunables for the graph store, the label resolver and the layout heuristic.
//!
//! Every section deserializes with per-field defaults, so a partial JSON file
//! such as `{ "resolver": { "max_passes": 8 } }` is a valid configuration.

use crate::graph::Position;
use serde::{Deserialize, Serialize};
use std::fs;

/// Key under which the strategy document is kept in a `KeyValueStore`.
pub const DEFAULT_STORAGE_KEY: &str = "flowtrader_strategy";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub resolver: ResolverConfig,
    pub layout: LayoutConfig,
    pub connection_policy: ConnectionPolicy,
    pub storage_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            resolver: ResolverConfig::default(),
            layout: LayoutConfig::default(),
            connection_policy: ConnectionPolicy::default(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl StoreConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Upper bound on resolution passes before the graph is flagged unstable.
    pub max_passes: usize,
    /// Headers are cut to this many characters (plus an ellipsis).
    pub max_header_chars: usize,
    /// Let Logic nodes derive `"<in1> AND <in2>"` style headers too.
    pub derive_logic_headers: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_passes: 32,
            max_header_chars: 512,
            derive_logic_headers: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Where the first node of an empty canvas goes.
    pub default_position: Position,
    /// Horizontal gap to the rightmost node.
    pub padding: f64,
    /// Vertical nudge relative to the rightmost node.
    pub vertical_offset: f64,
    /// Per-node vertical step of the stacking fallback.
    pub stack_step: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_position: Position::new(100.0, 150.0),
            padding: 200.0,
            vertical_offset: 50.0,
            stack_step: 20.0,
        }
    }
}

/// What `connect` does when the target input already has an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionPolicy {
    /// The new edge replaces the one already bound to that input.
    #[default]
    Replace,
    /// The second connection is rejected.
    Reject,
}
