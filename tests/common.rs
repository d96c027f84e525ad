//! Common test utilities for building strategy graphs.
use flowtrader::prelude::*;
use serde_json::{Map, Value, json};

/// Turns a `json!` object literal into a field map.
#[allow(dead_code)]
pub fn fields(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

#[allow(dead_code)]
pub fn add_indicator(store: &mut GraphStore, code: &str, period: u32) -> String {
    store
        .add_node(
            NodeKind::Indicator,
            fields(json!({ "indicatorType": code, "period": period })),
        )
        .expect("node should be created")
}

#[allow(dead_code)]
pub fn add_condition(store: &mut GraphStore, code: &str) -> String {
    store
        .add_node(NodeKind::Condition, fields(json!({ "conditionType": code })))
        .expect("node should be created")
}

#[allow(dead_code)]
pub fn add_threshold_condition(store: &mut GraphStore, code: &str, threshold: f64) -> String {
    store
        .add_node(
            NodeKind::Condition,
            fields(json!({ "conditionType": code, "threshold": threshold })),
        )
        .expect("node should be created")
}

#[allow(dead_code)]
pub fn link(store: &mut GraphStore, source: &str, source_handle: &str, target: &str, target_handle: &str) {
    store
        .connect(Connection::new(source, source_handle, target, target_handle))
        .expect("connection should be accepted");
}

/// `RSI(14) < EMA(20)`: returns the store and the ids of (rsi, ema, condition).
#[allow(dead_code)]
pub fn create_rsi_below_ema() -> (GraphStore, String, String, String) {
    let mut store = GraphStore::new();
    let rsi = add_indicator(&mut store, "RSI", 14);
    let ema = add_indicator(&mut store, "EMA", 20);
    let condition = add_condition(&mut store, "LT");
    link(&mut store, &rsi, "value", &condition, "a");
    link(&mut store, &ema, "value", &condition, "b");
    (store, rsi, ema, condition)
}

/// A saved document with a three-condition chain and no cached headers.
///
/// `c1 = Close > 30`, `c2 = c1 > 10`, `c3 = c2 < 5`.
#[allow(dead_code)]
pub const CHAIN_DOCUMENT_JSON: &str = r#"{
  "nodes": [
    { "id": "price", "type": "priceNode", "position": { "x": 50, "y": 150 }, "data": { "label": "Market Data" }, "deletable": false },
    { "id": "condition_1", "type": "conditionNode", "position": { "x": 250, "y": 200 }, "data": { "conditionType": "GT", "threshold": 30 } },
    { "id": "condition_2", "type": "conditionNode", "position": { "x": 450, "y": 250 }, "data": { "conditionType": "GT", "threshold": 10 } },
    { "id": "condition_3", "type": "conditionNode", "position": { "x": 650, "y": 300 }, "data": { "conditionType": "LT", "threshold": 5 } }
  ],
  "edges": [
    { "id": "e1", "source": "price", "sourceHandle": "close", "target": "condition_1", "targetHandle": "a", "type": "customEdge", "animated": false },
    { "id": "e2", "source": "condition_1", "sourceHandle": "result", "target": "condition_2", "targetHandle": "a", "type": "customEdge", "animated": false },
    { "id": "e3", "source": "condition_2", "sourceHandle": "result", "target": "condition_3", "targetHandle": "a", "type": "customEdge", "animated": false }
  ]
}"#;

/// A document saved without the Source node.
#[allow(dead_code)]
pub const MISSING_SOURCE_JSON: &str = r#"{
  "nodes": [
    { "id": "indicator_4", "type": "indicatorNode", "position": { "x": 300, "y": 100 }, "data": { "indicatorType": "SMA", "period": 50 } },
    { "id": "action_7", "type": "actionNode", "position": { "x": 700, "y": 100 }, "data": { "actionType": "EXIT", "positionType": "SHORT" }, "deletable": false }
  ],
  "edges": []
}"#;
