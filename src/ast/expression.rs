use super::Value;
use std::fmt;

/// Unary prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Negate,
    Plus,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Negate => "-",
            UnaryOp::Plus => "+",
        }
    }
}

/// Binary operators that always evaluate both operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,

    // Comparison
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    SmallerThan,
    SmallerThanOrEqual,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Remainder => "%",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterThanOrEqual => ">=",
            BinaryOp::SmallerThan => "<",
            BinaryOp::SmallerThanOrEqual => "<=",
        }
    }

    /// Binding strength. Higher numbers bind more tightly.
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Equal | BinaryOp::NotEqual => 4,
            BinaryOp::GreaterThan
            | BinaryOp::GreaterThanOrEqual
            | BinaryOp::SmallerThan
            | BinaryOp::SmallerThanOrEqual => 5,
            BinaryOp::Add | BinaryOp::Subtract => 6,
            BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Remainder => 7,
        }
    }
}

/// Short-circuiting operators. They yield one of their operands, not a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        }
    }

    pub fn precedence(&self) -> u8 {
        match self {
            LogicalOp::Or => 2,
            LogicalOp::And => 3,
        }
    }
}

/// The Abstract Syntax Tree of a user expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    // Leaf nodes
    Literal(Value),
    Identifier(String),

    // Access
    Member(Box<Expression>, String),
    Index(Box<Expression>, Box<Expression>),

    // Operators
    Unary(UnaryOp, Box<Expression>),
    Binary(BinaryOp, Box<Expression>, Box<Expression>),
    Logical(LogicalOp, Box<Expression>, Box<Expression>),
    Conditional(Box<Expression>, Box<Expression>, Box<Expression>),

    // Literals with children
    Array(Vec<Expression>),
    Object(Vec<(String, Expression)>),
}

impl Expression {
    /// Gets the precedence level for an expression type. Higher numbers bind more tightly.
    fn precedence(&self) -> u8 {
        match self {
            Expression::Conditional(..) => 1,
            Expression::Logical(op, ..) => op.precedence(),
            Expression::Binary(op, ..) => op.precedence(),
            Expression::Unary(..) => 8,
            Expression::Member(..) | Expression::Index(..) => 9,
            Expression::Literal(_)
            | Expression::Identifier(_)
            | Expression::Array(_)
            | Expression::Object(_) => 10,
        }
    }

    /// Recursively formats the expression, adding parentheses only when necessary.
    fn fmt_with_precedence(&self, f: &mut fmt::Formatter<'_>, parent_precedence: u8) -> fmt::Result {
        let current_precedence = self.precedence();
        let needs_parens = current_precedence < parent_precedence;

        if needs_parens {
            write!(f, "(")?;
        }

        match self {
            Expression::Literal(v) => write!(f, "{}", v)?,
            Expression::Identifier(name) => write!(f, "{}", name)?,
            Expression::Member(target, property) => {
                target.fmt_with_precedence(f, current_precedence)?;
                write!(f, ".{}", property)?;
            }
            Expression::Index(target, index) => {
                target.fmt_with_precedence(f, current_precedence)?;
                write!(f, "[")?;
                index.fmt_with_precedence(f, 0)?;
                write!(f, "]")?;
            }
            Expression::Unary(op, operand) => {
                write!(f, "{}", op.symbol())?;
                operand.fmt_with_precedence(f, current_precedence)?;
            }
            Expression::Binary(op, l, r) => {
                self.fmt_binary(f, op.symbol(), l, r, current_precedence)?
            }
            Expression::Logical(op, l, r) => {
                self.fmt_binary(f, op.symbol(), l, r, current_precedence)?
            }
            Expression::Conditional(test, then, otherwise) => {
                // The test binds tighter than `?`; the branches may be nested conditionals.
                test.fmt_with_precedence(f, current_precedence + 1)?;
                write!(f, " ? ")?;
                then.fmt_with_precedence(f, current_precedence)?;
                write!(f, " : ")?;
                otherwise.fmt_with_precedence(f, current_precedence)?;
            }
            Expression::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    item.fmt_with_precedence(f, 0)?;
                }
                write!(f, "]")?;
            }
            Expression::Object(fields) => {
                write!(f, "{{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: ", key)?;
                    value.fmt_with_precedence(f, 0)?;
                }
                write!(f, "}}")?;
            }
        }

        if needs_parens {
            write!(f, ")")?;
        }
        Ok(())
    }

    /// Helper function to format a generic binary expression. The right operand
    /// gets a stricter precedence so left-associative chains keep their grouping.
    fn fmt_binary(
        &self,
        f: &mut fmt::Formatter<'_>,
        op: &str,
        l: &Expression,
        r: &Expression,
        current_precedence: u8,
    ) -> fmt::Result {
        l.fmt_with_precedence(f, current_precedence)?;
        write!(f, " {} ", op)?;
        r.fmt_with_precedence(f, current_precedence + 1)?;
        Ok(())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Start the recursive formatting with the lowest parent precedence.
        self.fmt_with_precedence(f, 0)
    }
}
