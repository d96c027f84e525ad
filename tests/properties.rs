//! Property tests: graph invariants hold under arbitrary edit sequences.
use ahash::AHashSet;
use flowtrader::graph::behavior;
use flowtrader::persistence;
use flowtrader::prelude::*;
use proptest::prelude::*;
use serde_json::{Map, Value, json};

const INDICATORS: &[&str] = &["SMA", "EMA", "RSI", "MACD", "BBANDS", "STOCH"];
const CONDITIONS: &[&str] = &["GT", "LT", "EQ", "CROSS_ABOVE", "CROSS_BELOW"];
const GATES: &[&str] = &["AND", "OR", "NOT"];

#[derive(Debug, Clone)]
enum Edit {
    AddIndicator(usize),
    AddCondition(usize, Option<i32>),
    AddGate(usize),
    AddSource,
    Remove(usize),
    Connect(usize, usize, usize, usize),
    SetThreshold(usize, Option<i32>),
    Move(usize, i32, i32),
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0..INDICATORS.len()).prop_map(Edit::AddIndicator),
        (0..CONDITIONS.len(), proptest::option::of(-100..100i32))
            .prop_map(|(c, t)| Edit::AddCondition(c, t)),
        (0..GATES.len()).prop_map(Edit::AddGate),
        Just(Edit::AddSource),
        (0..16usize).prop_map(Edit::Remove),
        (0..16usize, 0..4usize, 0..16usize, 0..2usize)
            .prop_map(|(s, sh, t, th)| Edit::Connect(s, sh, t, th)),
        (0..16usize, proptest::option::of(-100..100i32))
            .prop_map(|(n, t)| Edit::SetThreshold(n, t)),
        (0..16usize, -500..1500i32, -500..1500i32)
            .prop_map(|(n, x, y)| Edit::Move(n, x, y)),
    ]
}

fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

fn node_id(store: &GraphStore, index: usize) -> String {
    let nodes = &store.snapshot().nodes;
    nodes[index % nodes.len()].id.clone()
}

/// Applies one edit, returning the id of a newly created node.
fn apply(store: &mut GraphStore, edit: Edit) -> Option<String> {
    match edit {
        Edit::AddIndicator(i) => store.add_node(
            NodeKind::Indicator,
            object(json!({ "indicatorType": INDICATORS[i] })),
        ).ok(),
        Edit::AddCondition(c, threshold) => store.add_node(
            NodeKind::Condition,
            object(json!({ "conditionType": CONDITIONS[c], "threshold": threshold })),
        ).ok(),
        Edit::AddGate(g) => store.add_node(
            NodeKind::Logic,
            object(json!({ "logicType": GATES[g] })),
        ).ok(),
        Edit::AddSource => {
            let created = store.apply(GraphEvent::CreateRequested {
                kind: NodeKind::Source,
                initial_data: Map::new(),
            });
            assert!(created.is_err());
            None
        }
        Edit::Remove(n) => {
            let id = node_id(store, n);
            let _ = store.remove_node(&id);
            None
        }
        Edit::Connect(s, sh, t, th) => {
            let source = node_id(store, s);
            let target = node_id(store, t);
            let (source_handle, target_handle) = {
                let graph = store.snapshot();
                let source_node = graph.node(&source)?;
                let target_node = graph.node(&target)?;
                let outputs = behavior(source_node.kind).output_handles(&source_node.data);
                let inputs = behavior(target_node.kind).input_handles(&target_node.data);
                if outputs.is_empty() || inputs.is_empty() {
                    return None;
                }
                (outputs[sh % outputs.len()], inputs[th % inputs.len()])
            };
            let _ = store.connect(Connection::new(&source, source_handle, &target, target_handle));
            None
        }
        Edit::SetThreshold(n, threshold) => {
            let id = node_id(store, n);
            let raw = threshold.map(|t| t.to_string()).unwrap_or_default();
            let _ = store.set_field(&id, "threshold", &raw);
            None
        }
        Edit::Move(n, x, y) => {
            let id = node_id(store, n);
            let _ = store.move_node(&id, Position::new(f64::from(x), f64::from(y)));
            None
        }
    }
}

fn assert_invariants(graph: &StrategyGraph) -> std::result::Result<(), TestCaseError> {
    let sources: Vec<_> = graph.nodes.iter().filter(|n| n.is_source()).collect();
    prop_assert_eq!(sources.len(), 1);
    prop_assert_eq!(sources[0].id.as_str(), SOURCE_NODE_ID);
    prop_assert!(!sources[0].deletable);

    let ids: AHashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    prop_assert_eq!(ids.len(), graph.nodes.len());
    for edge in &graph.edges {
        prop_assert!(ids.contains(edge.source.as_str()));
        prop_assert!(ids.contains(edge.target.as_str()));
    }
    let edge_ids: AHashSet<&str> = graph.edges.iter().map(|e| e.id.as_str()).collect();
    prop_assert_eq!(edge_ids.len(), graph.edges.len());
    Ok(())
}

proptest! {
    #[test]
    fn proptest_invariants_hold_after_every_edit(
        edits in prop::collection::vec(edit_strategy(), 0..60)
    ) {
        let mut store = GraphStore::new();
        let mut issued = AHashSet::new();

        for edit in edits {
            if let Some(id) = apply(&mut store, edit) {
                prop_assert!(issued.insert(id), "an id was handed out twice");
            }
            assert_invariants(store.snapshot())?;
            if let Some(selected) = store.selection() {
                prop_assert!(store.snapshot().contains_node(selected));
            }
        }
    }

    #[test]
    fn proptest_stable_graphs_round_trip_and_stay_fixed(
        edits in prop::collection::vec(edit_strategy(), 0..40)
    ) {
        let mut store = GraphStore::new();
        for edit in edits {
            apply(&mut store, edit);
        }
        prop_assume!(!store.has_unstable_labels());

        // Resolving a settled snapshot again changes nothing.
        let mut settled = store.snapshot().clone();
        let again = LabelResolver::default().resolve(&mut settled);
        prop_assert_eq!(again.passes, 1);
        prop_assert!(again.updated.is_empty());

        let text = persistence::to_json(store.snapshot()).unwrap();
        prop_assert!(!text.contains("calculatedHeader"));
        let mut restored = GraphStore::new();
        restored.replace_all(persistence::from_json(&text).unwrap()).unwrap();
        prop_assert_eq!(restored.snapshot(), store.snapshot());
    }
}
