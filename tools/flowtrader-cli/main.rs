use clap::{Parser, Subcommand};
use flowtrader::persistence;
use flowtrader::prelude::*;
use itertools::Itertools;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Inspect, replay and store node-based trading strategies
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Optional JSON configuration file (resolver, layout, connection policy)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a strategy document, resolve its headers and print every node
    Inspect {
        /// Path to the strategy JSON document
        strategy_path: String,
    },
    /// Apply a JSON array of graph events and print the resulting graph
    Replay {
        /// Path to the events JSON file
        events_path: String,
        /// Strategy document to start from instead of an empty canvas
        #[arg(short, long)]
        strategy: Option<String>,
        /// Where to write the resulting strategy document
        #[arg(short, long)]
        output: Option<String>,
        /// File store to save the result into, under the configured key
        #[arg(long)]
        store: Option<String>,
    },
    /// Load the strategy saved in a file store and print it
    Load {
        /// Path to the file store
        store_path: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => StoreConfig::from_file(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to read config file '{}': {}", path, e))
        }),
        None => StoreConfig::default(),
    };

    match cli.command {
        Command::Inspect { strategy_path } => run_inspect(config, &strategy_path),
        Command::Replay {
            events_path,
            strategy,
            output,
            store,
        } => run_replay(config, &events_path, strategy, output, store),
        Command::Load { store_path } => run_load(config, &store_path),
    }
}

fn run_inspect(config: StoreConfig, strategy_path: &str) {
    let start = Instant::now();
    let mut store = GraphStore::builder().with_config(config).build();
    let graph = read_strategy(strategy_path);
    store
        .replace_all(graph)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to install strategy: {}", e)));
    print_graph(&store);
    println!("Resolved in {:?}", start.elapsed());
}

fn run_replay(
    config: StoreConfig,
    events_path: &str,
    strategy: Option<String>,
    output: Option<String>,
    store_path: Option<String>,
) {
    let mut store = GraphStore::builder().with_config(config).build();
    if let Some(path) = strategy {
        store
            .replace_all(read_strategy(&path))
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to install strategy: {}", e)));
    }

    let events_json = fs::read_to_string(events_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read events file '{}': {}",
            events_path, e
        ))
    });
    let events: Vec<GraphEvent> = serde_json::from_str(&events_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse events JSON: {}", e)));

    println!("Replaying {} events...", events.len());
    let start = Instant::now();
    let mut rejected = 0;
    for (index, event) in events.into_iter().enumerate() {
        if let Err(e) = store.apply(event) {
            rejected += 1;
            println!("  - event #{} rejected: {}", index, e);
        }
    }
    let replay_duration = start.elapsed();

    print_graph(&store);
    println!("Rejected events: {}", rejected);
    println!("Replay took {:?}", replay_duration);

    if let Some(path) = output {
        let document = persistence::to_json(store.snapshot())
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to encode strategy: {}", e)));
        fs::write(&path, document).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to write strategy to '{}': {}", path, e))
        });
        println!("Strategy written to '{}'", path);
    }

    if let Some(path) = store_path {
        let mut file_store = FileStore::new(&path);
        store
            .save_to(&mut file_store)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to save strategy: {}", e)));
        println!(
            "Strategy saved to store '{}' under key '{}'",
            path,
            store.config().storage_key
        );
    }
}

fn run_load(config: StoreConfig, store_path: &str) {
    let mut store = GraphStore::builder().with_config(config).build();
    let file_store = FileStore::new(store_path);
    store
        .load_from(&file_store)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load strategy: {}", e)));
    print_graph(&store);
}

fn read_strategy(path: &str) -> StrategyGraph {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read strategy file '{}': {}", path, e))
    });
    persistence::from_json(&text)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse strategy: {}", e)))
}

fn print_graph(store: &GraphStore) {
    let graph = store.snapshot();

    println!("\n--- Nodes ({}) ---", graph.nodes.len());
    for node in &graph.nodes {
        println!(
            "{:<20} {:<14} {:<28} {}",
            node.id,
            node.kind.wire_name(),
            display_label(node),
            node.data.calculated_header().unwrap_or("-")
        );
    }

    println!("\n--- Edges ({}) ---", graph.edges.len());
    for edge in &graph.edges {
        println!(
            "{}:{} -> {}:{}",
            edge.source, edge.source_handle, edge.target, edge.target_handle
        );
    }

    println!();
    match store.labeling_warning() {
        Some(warning) => println!(
            "Labeling: UNSTABLE after {} passes ({})",
            warning.passes,
            warning.node_ids.iter().join(", ")
        ),
        None => println!("Labeling: stable"),
    }
    if let Some(selected) = store.selection() {
        println!("Selected: {}", selected);
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
