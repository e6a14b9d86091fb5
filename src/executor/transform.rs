use super::{NodeContext, NodeExecutor};
use crate::ast::Value;
use crate::compiler;
use crate::error::NodeError;
use crate::evaluator::{self, Bindings};
use crate::flow::TransformConfig;

impl NodeExecutor for TransformConfig {
    async fn execute(&self, ctx: &NodeContext<'_>) -> Result<Value, NodeError> {
        if self.expression.trim().is_empty() {
            // Identity: pass the first input through, or null when there is none.
            return Ok(match ctx.first_input() {
                Value::Absent => Value::Null,
                value => value,
            });
        }

        let expression = compiler::compile(&self.expression)?;
        let bindings = Bindings::for_inputs(ctx.inputs, ctx.source_node_ids);
        Ok(evaluator::evaluate(&expression, &bindings)?)
    }
}
