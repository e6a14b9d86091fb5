use super::lexer::{Token, TokenKind};
use crate::ast::{BinaryOp, Expression, LogicalOp, UnaryOp, Value};
use crate::error::ExpressionError;

/// Deepest expression tree the parser accepts before giving up. Operator and
/// member chains count one level per link, since they nest in the tree.
const MAX_DEPTH: usize = 128;

/// Recursive-descent parser with precedence climbing for binary operators.
pub(super) struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
    depth: usize,
}

/// A binary-level operator as seen by the precedence climber.
#[derive(Clone, Copy)]
enum Infix {
    Binary(BinaryOp),
    Logical(LogicalOp),
}

impl Infix {
    fn from_token(kind: &TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::OrOr => Infix::Logical(LogicalOp::Or),
            TokenKind::AndAnd => Infix::Logical(LogicalOp::And),
            TokenKind::EqEq => Infix::Binary(BinaryOp::Equal),
            TokenKind::BangEq => Infix::Binary(BinaryOp::NotEqual),
            TokenKind::Gt => Infix::Binary(BinaryOp::GreaterThan),
            TokenKind::GtEq => Infix::Binary(BinaryOp::GreaterThanOrEqual),
            TokenKind::Lt => Infix::Binary(BinaryOp::SmallerThan),
            TokenKind::LtEq => Infix::Binary(BinaryOp::SmallerThanOrEqual),
            TokenKind::Plus => Infix::Binary(BinaryOp::Add),
            TokenKind::Minus => Infix::Binary(BinaryOp::Subtract),
            TokenKind::Star => Infix::Binary(BinaryOp::Multiply),
            TokenKind::Slash => Infix::Binary(BinaryOp::Divide),
            TokenKind::Percent => Infix::Binary(BinaryOp::Remainder),
            _ => return None,
        };
        Some(op)
    }

    fn precedence(&self) -> u8 {
        match self {
            Infix::Binary(op) => op.precedence(),
            Infix::Logical(op) => op.precedence(),
        }
    }

    fn build(self, left: Expression, right: Expression) -> Expression {
        match self {
            Infix::Binary(op) => Expression::Binary(op, Box::new(left), Box::new(right)),
            Infix::Logical(op) => Expression::Logical(op, Box::new(left), Box::new(right)),
        }
    }
}

impl Parser {
    pub(super) fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            cursor: 0,
            depth: 0,
        }
    }

    /// Parses the whole token stream as a single expression.
    pub(super) fn parse(mut self) -> Result<Expression, ExpressionError> {
        if self.peek() == &TokenKind::Eof {
            return Err(self.error_here("expected an expression"));
        }
        let expression = self.parse_expression()?;
        match self.peek() {
            TokenKind::Eof => Ok(expression),
            other => Err(self.error_here(&format!("unexpected {}", other.describe()))),
        }
    }

    fn parse_expression(&mut self) -> Result<Expression, ExpressionError> {
        self.descend()?;
        let result = self.parse_conditional();
        self.depth -= 1;
        result
    }

    fn descend(&mut self) -> Result<(), ExpressionError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error_here("expression is nested too deeply"));
        }
        Ok(())
    }

    fn parse_conditional(&mut self) -> Result<Expression, ExpressionError> {
        let test = self.parse_binary(0)?;
        if !self.eat(&TokenKind::Question) {
            return Ok(test);
        }
        let then = self.parse_expression()?;
        self.expect(&TokenKind::Colon)?;
        let otherwise = self.parse_expression()?;
        Ok(Expression::Conditional(
            Box::new(test),
            Box::new(then),
            Box::new(otherwise),
        ))
    }

    /// Precedence climbing: every operator here is left-associative.
    fn parse_binary(&mut self, min_precedence: u8) -> Result<Expression, ExpressionError> {
        let entry = self.depth;
        let mut left = self.parse_unary()?;
        while let Some(op) = Infix::from_token(self.peek()) {
            let precedence = op.precedence();
            if precedence <= min_precedence {
                break;
            }
            self.descend()?;
            self.advance();
            let right = self.parse_binary(precedence)?;
            left = op.build(left, right);
        }
        self.depth = entry;
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expression, ExpressionError> {
        let op = match self.peek() {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Negate,
            TokenKind::Plus => UnaryOp::Plus,
            _ => return self.parse_postfix(),
        };
        self.advance();
        self.descend()?;
        let operand = self.parse_unary();
        self.depth -= 1;
        Ok(Expression::Unary(op, Box::new(operand?)))
    }

    fn parse_postfix(&mut self) -> Result<Expression, ExpressionError> {
        let entry = self.depth;
        let mut expression = self.parse_primary()?;
        loop {
            match self.peek() {
                TokenKind::Dot => {
                    self.descend()?;
                    self.advance();
                    let property = match self.peek().clone() {
                        TokenKind::Ident(name) => name,
                        other => {
                            return Err(self.error_here(&format!(
                                "expected a property name after '.', found {}",
                                other.describe()
                            )));
                        }
                    };
                    self.advance();
                    expression = Expression::Member(Box::new(expression), property);
                }
                TokenKind::LBracket => {
                    self.descend()?;
                    self.advance();
                    let index = self.parse_expression()?;
                    self.expect(&TokenKind::RBracket)?;
                    expression = Expression::Index(Box::new(expression), Box::new(index));
                }
                TokenKind::LParen => {
                    return Err(self.error_here("function calls are not supported"));
                }
                _ => {
                    self.depth = entry;
                    return Ok(expression);
                }
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Expression, ExpressionError> {
        let token = self.peek().clone();
        match token {
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expression::Literal(Value::Number(n)))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Expression::Literal(Value::String(s)))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(match name.as_str() {
                    "true" => Expression::Literal(Value::Bool(true)),
                    "false" => Expression::Literal(Value::Bool(false)),
                    "null" => Expression::Literal(Value::Null),
                    _ => Expression::Identifier(name),
                })
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::LBracket => {
                self.advance();
                self.parse_array()
            }
            TokenKind::LBrace => {
                self.advance();
                self.parse_object()
            }
            other => Err(self.error_here(&format!("unexpected {}", other.describe()))),
        }
    }

    fn parse_array(&mut self) -> Result<Expression, ExpressionError> {
        let mut items = Vec::new();
        while !self.eat(&TokenKind::RBracket) {
            items.push(self.parse_expression()?);
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RBracket)?;
                break;
            }
        }
        Ok(Expression::Array(items))
    }

    fn parse_object(&mut self) -> Result<Expression, ExpressionError> {
        let mut fields = Vec::new();
        while !self.eat(&TokenKind::RBrace) {
            let key = match self.peek().clone() {
                TokenKind::Ident(name) => name,
                TokenKind::Str(s) => s,
                TokenKind::Number(n) => Value::Number(n).to_text(),
                other => {
                    return Err(self.error_here(&format!(
                        "expected a property name, found {}",
                        other.describe()
                    )));
                }
            };
            self.advance();
            self.expect(&TokenKind::Colon)?;
            fields.push((key, self.parse_expression()?));
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RBrace)?;
                break;
            }
        }
        Ok(Expression::Object(fields))
    }

    fn peek(&self) -> &TokenKind {
        // The token stream always ends with `Eof`, and the cursor never moves past it.
        &self.tokens[self.cursor.min(self.tokens.len() - 1)].kind
    }

    fn advance(&mut self) {
        if self.cursor < self.tokens.len() - 1 {
            self.cursor += 1;
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), ExpressionError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.error_here(&format!(
                "expected {}, found {}",
                kind.describe(),
                self.peek().describe()
            )))
        }
    }

    fn error_here(&self, message: &str) -> ExpressionError {
        let position = self.tokens[self.cursor.min(self.tokens.len() - 1)].position;
        ExpressionError::Parse {
            message: message.to_string(),
            position,
        }
    }
}
