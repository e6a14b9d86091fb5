//! # Nagare - Visual Workflow Execution Engine
//!
//! **Nagare** runs workflows drawn in a node-based editor: a directed graph of
//! nodes that send HTTP requests, reshape data with expressions, and filter
//! collections. Each node runs once, after everything it depends on, and sees
//! the outputs of its upstream nodes as its inputs.
//!
//! ## Core Workflow
//!
//! The engine operates on a canonical model, the [`FlowDefinition`](flow::FlowDefinition):
//!
//! 1.  **Load Your Data**: Parse the editor document with [`UiWorkflow`](ui::UiWorkflow), or
//!     your own format into your own structs.
//! 2.  **Convert**: Call `into_flow()`. Custom formats implement [`IntoFlow`](flow::IntoFlow).
//! 3.  **Run**: Build an [`Engine`](coordinator::Engine) and `run` the flow. Structural
//!     problems (cycles, dangling edges) reject the run up front; node failures are
//!     collected per node and never stop the run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nagare::prelude::*;
//!
//! # async fn run_example() -> Result<()> {
//! let document = std::fs::read_to_string("workflow.json")?;
//! let flow = UiWorkflow::from_json(&document)?.into_flow()?;
//!
//! let engine = Engine::new()?;
//! let mut progress = engine.subscribe();
//! tokio::spawn(async move {
//!     while let Ok(event) = progress.recv().await {
//!         println!("{} -> {:?}", event.node_id, event.state);
//!     }
//! });
//!
//! let result = engine.run(&flow).await?;
//! println!("{}", RunReport::new(&result, &flow));
//! # Ok(())
//! # }
//! ```
//!
//! ## Expressions
//!
//! Transform nodes and filter conditions use a small expression language with
//! literals, `inputs[i]`, `$nodeId`, member access, arithmetic, comparisons,
//! `&&`/`||`/`!` and `?:`. Expressions are parsed and interpreted over an explicit
//! set of bindings; nothing outside those bindings is reachable.
//!
//! ```rust
//! use nagare::prelude::*;
//!
//! let mut bindings = Bindings::new();
//! bindings.bind("item", Value::object([("v", Value::from(5.0))]));
//! let kept = nagare::evaluator::evaluate_str("item.v > 3", &bindings).unwrap();
//! assert_eq!(kept, Value::Bool(true));
//! ```

pub mod ast;
pub mod compiler;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod evaluator;
pub mod executor;
pub mod flow;
pub mod prelude;
pub mod scheduler;
pub mod ui;
