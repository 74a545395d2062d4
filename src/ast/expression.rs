//! Expression tree nodes

use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

use super::operator::{BinaryOperator, UnaryOperator};
use crate::model::Value;
use crate::registry::function::FunctionDescriptor;

/// Argument list of a call; most calls take a handful of arguments
pub type Arguments = SmallVec<[Expression; 4]>;

/// Parsed expression tree
///
/// Nodes are immutable once built and own their children, so a tree can be
/// evaluated repeatedly, and from several threads at once.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Constant value
    Literal(Value),
    /// Named binding, resolved at evaluation time
    Variable(String),
    /// Prefix operator applied to one operand
    Unary {
        /// The operator
        op: UnaryOperator,
        /// Operand expression
        operand: Box<Expression>,
    },
    /// Infix operator applied to two operands
    Binary(Box<BinaryOpData>),
    /// Call to a registered function
    Call(Box<FunctionCallData>),
}

/// Operands of a binary node
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOpData {
    pub op: BinaryOperator,
    pub left: Expression,
    pub right: Expression,
}

/// A call bound to the descriptor it resolved to at parse time
#[derive(Debug, Clone)]
pub struct FunctionCallData {
    /// Name as written in the source
    pub name: String,
    /// Resolved function
    pub function: Arc<FunctionDescriptor>,
    /// Unevaluated arguments in source order
    pub args: Arguments,
}

impl PartialEq for FunctionCallData {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.args == other.args
    }
}

impl Expression {
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    pub fn unary(op: UnaryOperator, operand: Expression) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Self::Binary(Box::new(BinaryOpData { op, left, right }))
    }

    pub fn call(
        name: impl Into<String>,
        function: Arc<FunctionDescriptor>,
        args: impl IntoIterator<Item = Expression>,
    ) -> Self {
        Self::Call(Box::new(FunctionCallData {
            name: name.into(),
            function,
            args: args.into_iter().collect(),
        }))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// Depth of the tree; a single node has depth 1
    pub fn depth(&self) -> usize {
        match self {
            Self::Literal(_) | Self::Variable(_) => 1,
            Self::Unary { operand, .. } => 1 + operand.depth(),
            Self::Binary(data) => 1 + data.left.depth().max(data.right.depth()),
            Self::Call(data) => 1 + data.args.iter().map(Expression::depth).max().unwrap_or(0),
        }
    }
}

fn write_literal(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => f.write_str("null"),
        Value::String(s) => {
            f.write_str("'")?;
            for ch in s.chars() {
                match ch {
                    '\'' => f.write_str("\\'")?,
                    '\\' => f.write_str("\\\\")?,
                    '\n' => f.write_str("\\n")?,
                    '\r' => f.write_str("\\r")?,
                    '\t' => f.write_str("\\t")?,
                    other => write!(f, "{other}")?,
                }
            }
            f.write_str("'")
        }
        Value::Color(c) => f.write_str(&c.to_hex()),
        Value::Sequence(items) => {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_literal(f, item)?;
            }
            f.write_str("]")
        }
        other => write!(f, "{other}"),
    }
}

/// Canonical, fully parenthesised form
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write_literal(f, value),
            Self::Variable(name) => f.write_str(name),
            Self::Unary { op, operand } => write!(f, "({op}{operand})"),
            Self::Binary(data) => write!(f, "({} {} {})", data.left, data.op, data.right),
            Self::Call(data) => {
                write!(f, "{}(", data.name)?;
                for (i, arg) in data.args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}
