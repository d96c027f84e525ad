use clap::Parser;
use flowtrader::graph::params::{ConditionType, IndicatorType, LogicType};
use flowtrader::graph::{Connection, NodeKind, behavior};
use flowtrader::persistence;
use flowtrader::prelude::GraphStore;
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;
use rand::{Rng, rng};
use serde_json::{Map, Value, json};
use std::fs;

/// A CLI tool to generate random strategy documents for the FlowTrader resolver
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_strategy.json")]
    output: String,

    /// Number of indicator nodes
    #[arg(long, default_value_t = 4)]
    indicators: usize,

    /// Number of condition nodes
    #[arg(long, default_value_t = 6)]
    conditions: usize,

    /// Number of logic gates
    #[arg(long, default_value_t = 3)]
    gates: usize,

    /// Allow conditions to feed earlier conditions, which can create cycles
    #[arg(long)]
    cycles: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rng();
    let mut store = GraphStore::new();

    println!(
        "Generating strategy ({} indicators, {} conditions, {} gates)...",
        cli.indicators, cli.conditions, cli.gates
    );

    let indicators: Vec<String> = (0..cli.indicators)
        .map(|_| store.add_node(NodeKind::Indicator, random_indicator(&mut rng)))
        .collect::<Result<_, _>>()?;
    let conditions: Vec<String> = (0..cli.conditions)
        .map(|_| store.add_node(NodeKind::Condition, random_condition(&mut rng)))
        .collect::<Result<_, _>>()?;
    let gates: Vec<String> = (0..cli.gates)
        .map(|_| store.add_node(NodeKind::Logic, random_logic(&mut rng)))
        .collect::<Result<_, _>>()?;
    let entry = store.add_node(
        NodeKind::Action,
        fields(json!({ "actionType": "ENTRY", "positionType": "LONG" })),
    )?;

    // Every condition reads from the source, an indicator or (optionally) another condition.
    let mut producers: Vec<String> = vec!["price".to_string()];
    producers.extend(indicators.iter().cloned());
    for (index, condition) in conditions.iter().enumerate() {
        for handle in ["a", "b"] {
            let upstream = if cli.cycles && rng.random_bool(0.3) {
                conditions.choose(&mut rng).cloned()
            } else if index > 0 && rng.random_bool(0.3) {
                conditions[..index].choose(&mut rng).cloned()
            } else {
                producers.choose(&mut rng).cloned()
            };
            if let Some(upstream) = upstream {
                connect_any(&mut store, &mut rng, &upstream, condition, handle);
            }
        }
    }

    for gate in &gates {
        for handle in ["in", "in1", "in2"] {
            if let Some(upstream) = conditions.choose(&mut rng) {
                connect_any(&mut store, &mut rng, upstream, gate, handle);
            }
        }
    }
    if let Some(last) = gates.last().or(conditions.last()) {
        connect_any(&mut store, &mut rng, last, &entry, "trigger");
    }

    let graph = store.snapshot();
    println!(
        "-> {} nodes, {} edges, labeling {}",
        graph.nodes.len(),
        graph.edges.len(),
        if store.has_unstable_labels() {
            "unstable"
        } else {
            "stable"
        }
    );

    let json_output = persistence::to_json(graph)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated and saved strategy to '{}'",
        cli.output
    );

    Ok(())
}

/// Connects a random output of `source` to `handle`; ignored when the handle is not exposed.
fn connect_any(store: &mut GraphStore, rng: &mut ThreadRng, source: &str, target: &str, handle: &str) {
    let Some(node) = store.snapshot().node(source) else {
        return;
    };
    let outputs = behavior(node.kind).output_handles(&node.data);
    if let Some(output) = outputs.choose(rng) {
        let _ = store.connect(Connection::new(source, output, target, handle));
    }
}

fn random_indicator(rng: &mut ThreadRng) -> Map<String, Value> {
    let indicator = IndicatorType::ALL.choose(rng).copied().unwrap_or(IndicatorType::Sma);
    let mut data = fields(json!({ "indicatorType": indicator.code() }));
    for (field, default) in indicator.parameters() {
        let jitter = rng.random_range(0.5..2.0);
        data.insert(field.to_string(), json!((default * jitter).round().max(1.0)));
    }
    data
}

fn random_condition(rng: &mut ThreadRng) -> Map<String, Value> {
    let condition = ConditionType::ALL.choose(rng).copied().unwrap_or(ConditionType::Gt);
    let mut data = fields(json!({ "conditionType": condition.code() }));
    if rng.random_bool(0.4) {
        data.insert("threshold".to_string(), json!(rng.random_range(0..100)));
    }
    data
}

fn random_logic(rng: &mut ThreadRng) -> Map<String, Value> {
    let logic = LogicType::ALL.choose(rng).copied().unwrap_or(LogicType::And);
    fields(json!({ "logicType": logic.code() }))
}

fn fields(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}
