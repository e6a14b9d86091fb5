//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the nagare crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use nagare::prelude::*;
//!
//! # async fn run_example() -> Result<()> {
//! let flow = FlowDefinition::from_file("path/to/workflow.json")?;
//! let engine = Engine::builder()
//!     .with_config(EngineConfig::from_file("nagare.toml")?)
//!     .build()?;
//!
//! let result = engine.run(&flow).await?;
//! println!("{} succeeded, {} failed", result.succeeded_count(), result.failed_count());
//! # Ok(())
//! # }
//! ```

// Running workflows
pub use crate::config::EngineConfig;
pub use crate::coordinator::{
    Engine, EngineBuilder, ExecutionResult, NodeState, ProgressBus, ProgressEvent, RunReport,
};
pub use crate::scheduler::ExecutionPlan;

// Workflow model
pub use crate::flow::{
    FilterConfig, FilterMode, FlowDefinition, FlowEdge, FlowNode, Headers, HttpMethod, IntoFlow,
    NodeKind, NodeType, RequestConfig, TransformConfig, validate,
};
pub use crate::ui::{FlowConverter, UiWorkflow};

// Expressions
pub use crate::ast::{Expression, Value};
pub use crate::compiler::compile;
pub use crate::evaluator::{Bindings, evaluate};

// Error types
pub use crate::error::{
    ConfigError, ConversionError, DocumentError, ExpressionError, GraphError, NodeError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
