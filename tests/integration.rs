//! Integration tests for FlowTrader
//!
//! End-to-end scenarios: building a strategy through the store, resolving its
//! headers and moving it through persistence.
mod common;
use common::*;
use flowtrader::graph::behavior;
use flowtrader::persistence;
use flowtrader::prelude::*;
use serde_json::json;

#[test]
fn test_first_indicator_gets_first_id_and_no_header() {
    let mut store = GraphStore::new();
    let id = store.add_node(
        NodeKind::Indicator,
        fields(json!({ "indicatorType": "SMA", "period": 20 })),
    ).unwrap();

    assert_eq!(id, "indicator_1");
    let node = store.snapshot().node(&id).expect("node was added");
    assert_eq!(node.data.calculated_header(), None);
    assert_eq!(node.data.get("id"), Some(&json!("indicator_1")));
    assert_eq!(node.data.text("indicatorType"), Some("SMA"));
    // Right of the Source node at (50, 150).
    assert_eq!(node.position, Position::new(250.0, 200.0));
    assert_eq!(store.selection(), Some("indicator_1"));
}

#[test]
fn test_empty_canvas_uses_default_position() {
    let layout = LayoutHeuristic::default();
    assert_eq!(layout.place(&[]), Position::new(100.0, 150.0));
}

#[test]
fn test_close_above_threshold_header() {
    let mut store = GraphStore::new();
    let condition = add_threshold_condition(&mut store, "GT", 30.0);
    link(&mut store, SOURCE_NODE_ID, "close", &condition, "a");

    assert_eq!(store.snapshot().header_of(&condition), Some("Close > 30"));
    assert!(!store.has_unstable_labels());
}

#[test]
fn test_rsi_below_ema_header() {
    let (store, _, _, condition) = create_rsi_below_ema();
    assert_eq!(store.snapshot().header_of(&condition), Some("RSI(14) < EMA(20)"));
}

#[test]
fn test_load_without_source_synthesizes_it_first() {
    let mut store = GraphStore::new();
    let graph = persistence::from_json(MISSING_SOURCE_JSON).expect("document is valid");
    store.replace_all(graph).expect("graph installs");

    let snapshot = store.snapshot();
    let sources: Vec<_> = snapshot.nodes.iter().filter(|n| n.is_source()).collect();
    assert_eq!(sources.len(), 1);

    let first = &snapshot.nodes[0];
    assert_eq!(first.id, SOURCE_NODE_ID);
    assert_eq!(first.kind, NodeKind::Source);
    assert!(!first.deletable);
    assert_eq!(first.position, Position::new(50.0, 150.0));

    assert_eq!(snapshot.nodes.len(), 3);
    assert!(snapshot.node("indicator_4").is_some_and(|n| n.deletable));
    assert!(snapshot.node("action_7").is_some_and(|n| !n.deletable));
}

#[test]
fn test_threshold_overrides_input_b() {
    let (mut store, _, _, condition) = create_rsi_below_ema();

    store.set_field(&condition, "threshold", "70").unwrap();
    assert_eq!(store.snapshot().header_of(&condition), Some("RSI(14) < 70"));

    // The edge on `b` is kept but ignored while the threshold is set.
    assert!(store.snapshot().incoming(&condition, "b").is_some());
    let node = store.snapshot().node(&condition).unwrap();
    assert_eq!(behavior(node.kind).input_handles(&node.data), &["a"]);

    store.set_field(&condition, "threshold", "").unwrap();
    assert_eq!(store.snapshot().header_of(&condition), Some("RSI(14) < EMA(20)"));
}

#[test]
fn test_full_workflow_save_and_reload() {
    let (mut store, rsi, _, condition) = create_rsi_below_ema();
    let entry = store.add_node(
        NodeKind::Action,
        fields(json!({ "actionType": "ENTRY", "positionType": "LONG" })),
    ).unwrap();
    link(&mut store, &condition, "result", &entry, "trigger");

    let mut storage = MemoryStore::new();
    store.save_to(&mut storage).expect("save succeeds");

    let saved = storage
        .get("flowtrader_strategy")
        .unwrap()
        .expect("document stored under the well-known key");
    assert!(!saved.contains("calculatedHeader"));

    let mut reloaded = GraphStore::new();
    reloaded.load_from(&storage).expect("load succeeds");
    assert_eq!(
        reloaded.snapshot().header_of(&condition),
        Some("RSI(14) < EMA(20)")
    );
    assert_eq!(reloaded.snapshot().edges.len(), 3);
    assert!(reloaded.snapshot().node(&rsi).is_some());
    assert_eq!(reloaded.selection(), None);

    // Fresh ids continue after the loaded ones.
    let next = reloaded.add_node(NodeKind::Logic, fields(json!({ "logicType": "OR" }))).unwrap();
    assert_eq!(next, "logic_5");
}

#[test]
fn test_event_script_replay() {
    let script = r#"[
        { "event": "createRequested", "kind": "indicatorNode", "initialData": { "indicatorType": "RSI", "period": 14 } },
        { "event": "createRequested", "kind": "conditionNode", "initialData": { "conditionType": "GT" } },
        { "event": "edgeAdded", "source": "indicator_1", "sourceHandle": "value", "target": "condition_2", "targetHandle": "a" },
        { "event": "fieldChanged", "nodeId": "condition_2", "field": "threshold", "rawValue": "70" },
        { "event": "fieldChanged", "nodeId": "indicator_1", "field": "period", "rawValue": "abc" },
        { "event": "nodeRemoveRequested", "id": "price" },
        { "event": "nodeMoved", "id": "indicator_1", "position": { "x": 10, "y": 20 } },
        { "event": "selectionChanged", "id": null }
    ]"#;
    let events: Vec<GraphEvent> = serde_json::from_str(script).expect("script parses");

    let mut store = GraphStore::new();
    let results: Vec<_> = events.into_iter().map(|e| store.apply(e)).collect();

    assert!(results[..4].iter().all(std::result::Result::is_ok));
    assert!(matches!(results[4], Err(GraphError::NumericParse { .. })));
    assert!(matches!(results[5], Err(GraphError::ProtectedNode(_))));
    assert!(results[6].is_ok() && results[7].is_ok());

    let snapshot = store.snapshot();
    assert_eq!(snapshot.header_of("condition_2"), Some("RSI(14) > 70"));
    assert_eq!(snapshot.node("indicator_1").unwrap().position, Position::new(10.0, 20.0));
    assert_eq!(store.selection(), None);
}
