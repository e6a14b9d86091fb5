//! Turns user-authored expression text into an [`Expression`] tree.
//!
//! The grammar is small and fixed:
//!
//! - literals: numbers, `'single'` or `"double"` quoted strings, `true`, `false`, `null`,
//!   array literals `[a, b]` and object literals `{ key: value }`
//! - identifiers, resolved later against an explicit binding table (`inputs`, `$nodeId`, `item`)
//! - property and index access: `a.b`, `a[0]`, `a["key"]`
//! - unary `!`, `-`, `+`
//! - arithmetic `+ - * / %`, comparison `< <= > >=`, equality `== !=` (also spelled `=== !==`)
//! - logical `&&`, `||` and the conditional `test ? a : b`
//!
//! Function calls, assignment and any other statement form are rejected at parse time.

use crate::ast::Expression;
use crate::error::ExpressionError;
use tracing::trace;

mod lexer;
mod parser;

use parser::Parser;

/// Parses expression source into an AST.
pub fn compile(source: &str) -> Result<Expression, ExpressionError> {
    let tokens = lexer::tokenize(source)?;
    let expression = Parser::new(tokens).parse()?;
    trace!(%expression, "Compiled expression");
    Ok(expression)
}
