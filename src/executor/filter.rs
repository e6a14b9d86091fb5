use super::{NodeContext, NodeExecutor};
use crate::ast::Value;
use crate::compiler;
use crate::error::NodeError;
use crate::evaluator::{self, Bindings};
use crate::flow::{FilterConfig, FilterMode};

impl NodeExecutor for FilterConfig {
    async fn execute(&self, ctx: &NodeContext<'_>) -> Result<Value, NodeError> {
        let subject = unwrap_response(ctx.first_input());
        match self.mode {
            FilterMode::Array => self.filter_array(subject),
            FilterMode::Object => self.filter_object(subject),
        }
    }
}

impl FilterConfig {
    /// Keeps the elements for which `condition` is truthy, in their original order.
    fn filter_array(&self, subject: Value) -> Result<Value, NodeError> {
        let items = match subject {
            Value::Array(items) => items,
            other => return Err(type_mismatch("array", &other)),
        };
        if self.condition.trim().is_empty() {
            return Ok(Value::Array(items));
        }

        let condition = compiler::compile(&self.condition)?;
        let mut kept = Vec::with_capacity(items.len());
        for item in items {
            let bindings = Bindings::for_item(item.clone());
            if evaluator::evaluate(&condition, &bindings)?.is_truthy() {
                kept.push(item);
            }
        }
        Ok(Value::Array(kept))
    }

    /// Returns a shallow copy of the subject holding only the listed fields.
    fn filter_object(&self, subject: Value) -> Result<Value, NodeError> {
        let fields = match subject {
            Value::Object(fields) => fields,
            other => return Err(type_mismatch("object", &other)),
        };
        let keep: Vec<&str> = self
            .keep_fields
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .collect();
        if keep.is_empty() {
            return Ok(Value::Object(fields));
        }

        Ok(Value::Object(
            fields
                .into_iter()
                .filter(|(key, _)| keep.contains(&key.as_str()))
                .collect(),
        ))
    }
}

/// A record whose `data` field is an array (such as a request node's output)
/// is replaced by that array.
fn unwrap_response(subject: Value) -> Value {
    match subject {
        Value::Object(mut fields) if matches!(fields.get("data"), Some(Value::Array(_))) => {
            fields.remove("data").unwrap_or(Value::Absent)
        }
        other => other,
    }
}

fn type_mismatch(expected: &str, found: &Value) -> NodeError {
    NodeError::TypeMismatch {
        expected: expected.to_string(),
        found: found.type_name().to_string(),
    }
}
