//! # FlowTrader - Strategy Graph Model
//!
//! **FlowTrader** is the model behind a node-based trading strategy builder. A
//! strategy is a directed graph of typed nodes (a market-data source,
//! technical indicators, comparison conditions, boolean logic gates and trade
//! actions) whose edges connect named output handles to named input handles.
//!
//! The crate owns the graph, not the canvas. A rendering surface feeds it
//! change requests and redraws whatever snapshot comes back.
//!
//! ## Core Workflow
//!
//! 1.  **Mutate**: Every edit goes through a `GraphStore` entry point (`add_node`,
//!     `connect`, `set_field`, ...) or the single `apply(GraphEvent)` dispatcher.
//! 2.  **Resolve**: After each mutation the `LabelResolver` recomputes the
//!     derived header of every Condition node (`"RSI(14) < EMA(20)"`), repeating
//!     passes until the headers reach a fixed point or a pass bound is hit.
//! 3.  **Render**: The stabilized `StrategyGraph` snapshot, the selection and
//!     the unstable-labeling flag are what the canvas draws.
//! 4.  **Persist**: `persistence::codec` turns the graph into a portable JSON
//!     document (never including derived headers) and back, re-asserting the
//!     graph invariants on load.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowtrader::prelude::*;
//! use serde_json::{json, Map};
//!
//! fn fields(value: serde_json::Value) -> Map<String, serde_json::Value> {
//!     value.as_object().cloned().unwrap_or_default()
//! }
//!
//! fn main() -> Result<()> {
//!     let mut store = GraphStore::new();
//!
//!     let rsi = store.add_node(NodeKind::Indicator, fields(json!({ "indicatorType": "RSI", "period": 14 })))?;
//!     let below = store.add_node(NodeKind::Condition, fields(json!({ "conditionType": "LT" })))?;
//!
//!     store.connect(Connection::new(&rsi, "value", &below, "a"))?;
//!     store.set_field(&below, "threshold", "30")?;
//!
//!     println!("{:?}", store.snapshot().header_of(&below)); // Some("RSI(14) < 30")
//!
//!     let mut storage = MemoryStore::new();
//!     store.save_to(&mut storage)?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod labels;
pub mod persistence;
pub mod prelude;
pub mod store;
