use super::Bindings;
use crate::ast::{BinaryOp, Expression, LogicalOp, UnaryOp, Value};
use crate::error::ExpressionError;
use std::cmp::Ordering;
use std::collections::BTreeMap;

// This macro generates the evaluation of a numeric binary operation.
macro_rules! eval_op {
    ($self:ident, $op:expr, $l:ident, $r:ident, $op_fn:expr, number) => {
        $self.eval_arithmetic($op, $l, $r, $op_fn)
    };
    ($self:ident, $op:expr, $l:ident, $r:ident, $op_fn:expr, ordering) => {
        $self.eval_comparison($op, $l, $r, $op_fn)
    };
}

/// The core recursive engine for evaluating a single AST against a binding table.
pub(super) struct AstEngine<'a> {
    expression: &'a Expression,
    bindings: &'a Bindings,
}

impl<'a> AstEngine<'a> {
    pub(super) fn new(expression: &'a Expression, bindings: &'a Bindings) -> Self {
        Self {
            expression,
            bindings,
        }
    }

    /// Evaluates the AST and returns its value.
    pub(super) fn evaluate(&self) -> Result<Value, ExpressionError> {
        self.evaluate_recursive(self.expression)
    }

    fn evaluate_recursive(&self, expr: &Expression) -> Result<Value, ExpressionError> {
        match expr {
            // --- Leaf nodes ---
            Expression::Literal(value) => Ok(value.clone()),
            Expression::Identifier(name) => self
                .bindings
                .get(name)
                .cloned()
                .ok_or_else(|| ExpressionError::UnboundName(name.clone())),

            // --- Access ---
            Expression::Member(target, property) => {
                let target = self.evaluate_recursive(target)?;
                read_property(&target, property)
            }
            Expression::Index(target, index) => {
                let target = self.evaluate_recursive(target)?;
                let index = self.evaluate_recursive(index)?;
                read_index(&target, &index)
            }

            // --- Unary operations ---
            Expression::Unary(op, operand) => {
                let value = self.evaluate_recursive(operand)?;
                match (op, value) {
                    (UnaryOp::Not, value) => Ok(Value::Bool(!value.is_truthy())),
                    (UnaryOp::Negate, Value::Number(n)) => Ok(Value::Number(-n)),
                    (UnaryOp::Plus, Value::Number(n)) => Ok(Value::Number(n)),
                    (op, value) => Err(type_error(&format!(
                        "cannot apply unary '{}' to {}",
                        op.symbol(),
                        value.type_name()
                    ))),
                }
            }

            // --- Arithmetic operations ---
            Expression::Binary(BinaryOp::Add, l, r) => {
                let left = self.evaluate_recursive(l)?;
                let right = self.evaluate_recursive(r)?;
                match (&left, &right) {
                    (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                    (Value::String(_), _) | (_, Value::String(_)) if concatenable(&left, &right) => {
                        Ok(Value::String(format!("{}{}", left.to_text(), right.to_text())))
                    }
                    _ => Err(operand_error("+", &left, &right)),
                }
            }
            Expression::Binary(BinaryOp::Subtract, l, r) => {
                eval_op!(self, "-", l, r, |a, b| a - b, number)
            }
            Expression::Binary(BinaryOp::Multiply, l, r) => {
                eval_op!(self, "*", l, r, |a, b| a * b, number)
            }
            Expression::Binary(BinaryOp::Divide, l, r) => {
                eval_op!(self, "/", l, r, |a, b| a / b, number)
            }
            Expression::Binary(BinaryOp::Remainder, l, r) => {
                eval_op!(self, "%", l, r, |a, b| a % b, number)
            }

            // --- Comparison operations ---
            Expression::Binary(BinaryOp::GreaterThan, l, r) => {
                eval_op!(self, ">", l, r, |o| o == Ordering::Greater, ordering)
            }
            Expression::Binary(BinaryOp::GreaterThanOrEqual, l, r) => {
                eval_op!(self, ">=", l, r, |o| o != Ordering::Less, ordering)
            }
            Expression::Binary(BinaryOp::SmallerThan, l, r) => {
                eval_op!(self, "<", l, r, |o| o == Ordering::Less, ordering)
            }
            Expression::Binary(BinaryOp::SmallerThanOrEqual, l, r) => {
                eval_op!(self, "<=", l, r, |o| o != Ordering::Greater, ordering)
            }

            // --- Equality ---
            Expression::Binary(BinaryOp::Equal, l, r) => {
                let left = self.evaluate_recursive(l)?;
                let right = self.evaluate_recursive(r)?;
                Ok(Value::Bool(left == right))
            }
            Expression::Binary(BinaryOp::NotEqual, l, r) => {
                let left = self.evaluate_recursive(l)?;
                let right = self.evaluate_recursive(r)?;
                Ok(Value::Bool(left != right))
            }

            // --- Logical operations ---
            Expression::Logical(LogicalOp::And, l, r) => {
                let left = self.evaluate_recursive(l)?;
                if !left.is_truthy() {
                    return Ok(left);
                }
                self.evaluate_recursive(r)
            }
            Expression::Logical(LogicalOp::Or, l, r) => {
                let left = self.evaluate_recursive(l)?;
                if left.is_truthy() {
                    return Ok(left);
                }
                self.evaluate_recursive(r)
            }
            Expression::Conditional(test, then, otherwise) => {
                if self.evaluate_recursive(test)?.is_truthy() {
                    self.evaluate_recursive(then)
                } else {
                    self.evaluate_recursive(otherwise)
                }
            }

            // --- Literals with children ---
            Expression::Array(items) => items
                .iter()
                .map(|item| self.evaluate_recursive(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Expression::Object(fields) => {
                let mut object = BTreeMap::new();
                for (key, value) in fields {
                    object.insert(key.clone(), self.evaluate_recursive(value)?);
                }
                Ok(Value::Object(object))
            }
        }
    }

    fn eval_arithmetic<F>(
        &self,
        op: &str,
        l: &Expression,
        r: &Expression,
        f: F,
    ) -> Result<Value, ExpressionError>
    where
        F: Fn(f64, f64) -> f64,
    {
        let left = self.evaluate_recursive(l)?;
        let right = self.evaluate_recursive(r)?;
        match (&left, &right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(f(*a, *b))),
            _ => Err(operand_error(op, &left, &right)),
        }
    }

    fn eval_comparison<F>(
        &self,
        op: &str,
        l: &Expression,
        r: &Expression,
        f: F,
    ) -> Result<Value, ExpressionError>
    where
        F: Fn(Ordering) -> bool,
    {
        let left = self.evaluate_recursive(l)?;
        let right = self.evaluate_recursive(r)?;
        let ordering = match (&left, &right) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => return Err(operand_error(op, &left, &right)),
        };
        // Any comparison involving NaN is false.
        Ok(Value::Bool(ordering.is_some_and(f)))
    }
}

fn concatenable(left: &Value, right: &Value) -> bool {
    let plain = |v: &Value| {
        matches!(
            v,
            Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null
        )
    };
    plain(left) && plain(right)
}

fn read_property(target: &Value, property: &str) -> Result<Value, ExpressionError> {
    match target {
        Value::Absent | Value::Null => Err(type_error(&format!(
            "cannot read property '{}' of {}",
            property,
            target.type_name()
        ))),
        Value::Object(fields) => Ok(fields.get(property).cloned().unwrap_or(Value::Absent)),
        Value::Array(items) if property == "length" => Ok(Value::Number(items.len() as f64)),
        Value::String(s) if property == "length" => Ok(Value::Number(s.chars().count() as f64)),
        _ => Ok(Value::Absent),
    }
}

fn read_index(target: &Value, index: &Value) -> Result<Value, ExpressionError> {
    match (target, index) {
        (Value::Absent | Value::Null, _) => Err(type_error(&format!(
            "cannot read index {} of {}",
            index,
            target.type_name()
        ))),
        (Value::Array(items), Value::Number(n)) => Ok(array_slot(*n)
            .and_then(|i| items.get(i))
            .cloned()
            .unwrap_or(Value::Absent)),
        (Value::String(s), Value::Number(n)) => Ok(array_slot(*n)
            .and_then(|i| s.chars().nth(i))
            .map(|c| Value::String(c.to_string()))
            .unwrap_or(Value::Absent)),
        (Value::Object(fields), key @ (Value::String(_) | Value::Number(_))) => {
            Ok(fields.get(&key.to_text()).cloned().unwrap_or(Value::Absent))
        }
        (_, Value::String(property)) => read_property(target, property),
        _ => Ok(Value::Absent),
    }
}

/// Converts a numeric index into a slot, if it is a non-negative integer.
fn array_slot(n: f64) -> Option<usize> {
    if n >= 0.0 && n.fract() == 0.0 {
        Some(n as usize)
    } else {
        None
    }
}

fn operand_error(op: &str, left: &Value, right: &Value) -> ExpressionError {
    type_error(&format!(
        "cannot apply '{}' to {} and {}",
        op,
        left.type_name(),
        right.type_name()
    ))
}

fn type_error(message: &str) -> ExpressionError {
    ExpressionError::TypeError(message.to_string())
}
