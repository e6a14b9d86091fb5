use crate::ast::{Expression, Value};
use crate::compiler;
use crate::error::ExpressionError;
use ahash::AHashMap;

mod engine;

use engine::AstEngine;

/// The closed set of names an expression may read.
///
/// Evaluation never looks anywhere else: a name that is not bound here fails
/// with [`ExpressionError::UnboundName`].
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: AHashMap<String, Value>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the upstream outputs of a node.
    ///
    /// `inputs` is bound as an array in edge order, and each source node `X`
    /// is additionally bound as `$X` to the input at the same position.
    pub fn for_inputs(inputs: &[Value], source_node_ids: &[String]) -> Self {
        let mut bindings = Self::new();
        bindings.bind("inputs", Value::Array(inputs.to_vec()));
        for (source_id, input) in source_node_ids.iter().zip(inputs) {
            bindings.bind(format!("${}", source_id), input.clone());
        }
        bindings
    }

    /// Binds a single element for per-item filter conditions.
    pub fn for_item(item: Value) -> Self {
        let mut bindings = Self::new();
        bindings.bind("item", item);
        bindings
    }

    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

/// Evaluates a compiled expression against a binding table.
pub fn evaluate(expression: &Expression, bindings: &Bindings) -> Result<Value, ExpressionError> {
    AstEngine::new(expression, bindings).evaluate()
}

/// Compiles and evaluates expression source in one step.
pub fn evaluate_str(source: &str, bindings: &Bindings) -> Result<Value, ExpressionError> {
    let expression = compiler::compile(source)?;
    evaluate(&expression, bindings)
}
