use clap::{Parser, Subcommand, ValueEnum};
use nagare::prelude::*;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Run, order and validate node-based workflows
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Document format of the workflow file
    #[arg(short, long, value_enum, global = true, default_value_t = FormatCli::Auto)]
    format: FormatCli,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute every node and print the results
    Run {
        /// Path to the workflow JSON file
        workflow_path: String,

        /// Path to an engine config TOML file
        #[arg(short, long)]
        config: Option<String>,

        /// Print the raw result as JSON instead of the report
        #[arg(long)]
        json: bool,

        /// Print node state changes while the workflow runs
        #[arg(long)]
        progress: bool,
    },
    /// Print the execution order without running anything
    Order {
        workflow_path: String,

        /// Print dependency levels instead of a flat order
        #[arg(long)]
        levels: bool,
    },
    /// Check the workflow for cycles, dangling edges and duplicate ids
    Validate { workflow_path: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatCli {
    /// Detect the format from the node records
    Auto,
    Canonical,
    Editor,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nagare=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            workflow_path,
            config,
            json,
            progress,
        } => run_workflow(&workflow_path, cli.format, config.as_deref(), json, progress).await,
        Command::Order {
            workflow_path,
            levels,
        } => print_order(&workflow_path, cli.format, levels),
        Command::Validate { workflow_path } => validate_workflow(&workflow_path, cli.format),
    }
}

async fn run_workflow(
    path: &str,
    format: FormatCli,
    config_path: Option<&str>,
    json: bool,
    show_progress: bool,
) {
    let total_start = Instant::now();
    let flow = load_flow(path, format);

    let config = match config_path {
        Some(config_path) => EngineConfig::from_file(config_path)
            .unwrap_or_else(|e| exit_with_error(&e.to_string())),
        None => EngineConfig::default(),
    };
    let engine = Engine::builder()
        .with_config(config)
        .build()
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));

    let printer = show_progress.then(|| {
        let mut events = engine.subscribe();
        tokio::spawn(async move {
            while let Ok(event) = events.recv().await {
                let marker = match event.state {
                    NodeState::Running => "…",
                    NodeState::Succeeded => "✓",
                    NodeState::Failed => "✗",
                };
                eprintln!("  {} {}", marker, event.node_id);
            }
        })
    });

    let run_start = Instant::now();
    let result = engine
        .run(&flow)
        .await
        .unwrap_or_else(|e| exit_with_error(&format!("Workflow rejected: {}", e)));
    let run_duration = run_start.elapsed();

    // Dropping the engine closes the bus so the printer drains and stops.
    drop(engine);
    if let Some(printer) = printer {
        let _ = printer.await;
    }

    if json {
        let output = result
            .to_json()
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to encode result: {}", e)));
        println!("{}", output);
    } else {
        println!("{}", RunReport::new(&result, &flow));
        println!("--- Performance Summary ---");
        println!("Execution:        {:?}", run_duration);
        println!("Total:            {:?}", total_start.elapsed());
    }

    if !result.is_success() {
        std::process::exit(2);
    }
}

fn print_order(path: &str, format: FormatCli, by_level: bool) {
    let flow = load_flow(path, format);
    if by_level {
        let levels = nagare::scheduler::levels(&flow.nodes, &flow.edges)
            .unwrap_or_else(|e| exit_with_error(&e.to_string()));
        for (depth, level) in levels.iter().enumerate() {
            println!("{}: {}", depth, level.join(", "));
        }
    } else {
        let order = nagare::scheduler::order(&flow.nodes, &flow.edges)
            .unwrap_or_else(|e| exit_with_error(&e.to_string()));
        for (position, node_id) in order.iter().enumerate() {
            let name = flow.node(node_id).map_or(node_id.as_str(), |n| n.display_name());
            println!("{:>3}. {} ({})", position + 1, name, node_id);
        }
    }
}

fn validate_workflow(path: &str, format: FormatCli) {
    let flow = load_flow(path, format);
    if let Err(e) = validate(&flow) {
        exit_with_error(&e.to_string());
    }
    println!(
        "Workflow is valid: {} node(s), {} edge(s)",
        flow.nodes.len(),
        flow.edges.len()
    );
}

fn load_flow(path: &str, format: FormatCli) -> FlowDefinition {
    let text = fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read workflow file '{}': {}", path, e)));

    let from_editor = |text: &str| -> FlowDefinition {
        UiWorkflow::from_json(text)
            .and_then(|workflow| workflow.into_flow())
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to convert workflow: {}", e)))
    };

    match format {
        FormatCli::Canonical => FlowDefinition::from_json(&text)
            .unwrap_or_else(|e| exit_with_error(&e.to_string())),
        FormatCli::Editor => from_editor(&text),
        FormatCli::Auto if looks_like_editor(&text) => from_editor(&text),
        FormatCli::Auto => FlowDefinition::from_json(&text)
            .unwrap_or_else(|e| exit_with_error(&e.to_string())),
    }
}

/// Editor documents keep node settings under `data`; canonical ones under `config`.
fn looks_like_editor(text: &str) -> bool {
    let Ok(document) = serde_json::from_str::<serde_json::Value>(text) else {
        return false;
    };
    document["nodes"]
        .as_array()
        .is_some_and(|nodes| nodes.iter().any(|n| n.get("data").is_some() && n.get("config").is_none()))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
