//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the flowtrader crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use flowtrader::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let text = std::fs::read_to_string("path/to/strategy.json")?;
//! let graph = flowtrader::persistence::from_json(&text)?;
//!
//! let mut store = GraphStore::new();
//! store.replace_all(graph)?;
//! for node in &store.snapshot().nodes {
//!     println!("{} -> {:?}", display_label(node), node.data.calculated_header());
//! }
//! # Ok(())
//! # }
//! ```

// Graph store and events
pub use crate::store::{GraphEvent, GraphStore, GraphStoreBuilder};

// Graph model
pub use crate::graph::{
    Connection, Edge, IdAllocator, LayoutHeuristic, Node, NodeData, NodeKind, Position,
    SOURCE_NODE_ID, StrategyGraph, display_label,
};

// Label resolution
pub use crate::labels::{LabelResolver, Resolution};

// Persistence
pub use crate::persistence::{FileStore, KeyValueStore, MemoryStore, StrategyDocument};

// Configuration
pub use crate::config::{ConnectionPolicy, LayoutConfig, ResolverConfig, StoreConfig};

// Error types
pub use crate::error::{GraphError, LabelingUnstable, PersistenceError, StoreError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
