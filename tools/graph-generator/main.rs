use clap::Parser;
use nagare::flow::{
    FilterConfig, FlowDefinition, FlowEdge, FlowNode, HttpMethod, NodeKind, RequestConfig,
    TransformConfig,
};
use rand::Rng;
use rand::rngs::ThreadRng;

/// A CLI tool to generate random acyclic workflows for the nagare engine
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated workflow JSON file to
    #[arg(short, long, default_value = "generated_workflow.json")]
    output: String,

    /// Number of nodes to generate
    #[arg(short, long, default_value_t = 20)]
    nodes: usize,

    /// Maximum number of upstream edges per node
    #[arg(long, default_value_t = 3)]
    max_inputs: usize,

    /// When set, nodes without inputs become GET requests against this base URL
    #[arg(long)]
    base_url: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.nodes == 0 {
        eprintln!("Error: --nodes must be at least 1");
        std::process::exit(1);
    }

    println!(
        "Generating a workflow with {} node(s), up to {} input(s) each...",
        cli.nodes, cli.max_inputs
    );

    let mut nodes = Vec::with_capacity(cli.nodes);
    let mut edges = Vec::new();

    for index in 0..cli.nodes {
        let id = format!("n{:03}", index);

        // Edges only point from earlier to later nodes, so the graph is acyclic.
        let input_count = if index == 0 {
            0
        } else {
            rng.random_range(0..=cli.max_inputs.min(index))
        };
        let mut sources: Vec<usize> = (0..input_count)
            .map(|_| rng.random_range(0..index))
            .collect();
        sources.sort_unstable();
        sources.dedup();

        for source in &sources {
            edges.push(FlowEdge::new(
                format!("e{}", edges.len()),
                format!("n{:03}", source),
                id.clone(),
            ));
        }

        let kind = generate_kind(&mut rng, &sources, cli.base_url.as_deref());
        nodes.push(FlowNode::new(id, kind).with_label(format!("Step {}", index + 1)));
    }

    // Shuffle declaration order so the scheduler has to do real work.
    for i in (1..nodes.len()).rev() {
        let j = rng.random_range(0..=i);
        nodes.swap(i, j);
    }

    let flow = FlowDefinition::new(nodes, edges);
    flow.save(&cli.output)?;

    println!(
        "Successfully generated and saved {} node(s) and {} edge(s) to '{}'",
        flow.nodes.len(),
        flow.edges.len(),
        cli.output
    );

    Ok(())
}

/// Picks a node type whose expression only reads inputs the node actually has.
fn generate_kind(rng: &mut ThreadRng, sources: &[usize], base_url: Option<&str>) -> NodeKind {
    if sources.is_empty() {
        return match base_url {
            Some(base) => NodeKind::Request(RequestConfig::new(
                HttpMethod::Get,
                format!("{}/items/{}", base.trim_end_matches('/'), rng.random_range(1..100)),
            )),
            None => NodeKind::Transform(TransformConfig::new(generate_literal(rng))),
        };
    }

    match rng.random_range(0..4) {
        0 => NodeKind::Filter(FilterConfig::array(format!(
            "item.value > {}",
            rng.random_range(0..50)
        ))),
        1 => NodeKind::Filter(FilterConfig::object(["id", "value"])),
        _ => {
            let reads: Vec<String> = sources
                .iter()
                .map(|source| format!("$n{:03}", source))
                .collect();
            NodeKind::Transform(TransformConfig::new(format!(
                "{{ sources: [{}], count: inputs.length }}",
                reads.join(", ")
            )))
        }
    }
}

fn generate_literal(rng: &mut ThreadRng) -> String {
    let items: Vec<String> = (0..rng.random_range(1..6))
        .map(|id| format!("{{ id: {}, value: {} }}", id, rng.random_range(0..100)))
        .collect();
    format!("[{}]", items.join(", "))
}
