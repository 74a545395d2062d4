//! Built-in operator descriptors and operator semantics

pub mod arithmetic;
pub mod bitwise;
pub mod comparison;
pub mod logical;

use crate::ast::{BinaryOperator, Expression, UnaryOperator};
use crate::evaluator::EvaluationResult;
use crate::model::{StringComparison, Value};
use crate::parser::error::ParseResult;
use crate::parser::tokenizer::{SpannedToken, Token};
use crate::registry::operator::{
    ExpressionOperator, OperatorRegistry, Precedence, require_operand,
};

/// Operator that is only ever binary
pub struct InfixOperator {
    tags: &'static [&'static str],
    name: &'static str,
    precedence: Precedence,
    op: BinaryOperator,
}

impl InfixOperator {
    pub const fn new(
        tags: &'static [&'static str],
        name: &'static str,
        precedence: Precedence,
        op: BinaryOperator,
    ) -> Self {
        Self {
            tags,
            name,
            precedence,
            op,
        }
    }
}

impl ExpressionOperator for InfixOperator {
    fn tags(&self) -> &[&'static str] {
        self.tags
    }

    fn human_friendly_name(&self) -> &str {
        self.name
    }

    fn precedence(&self) -> Precedence {
        self.precedence
    }

    fn build(
        &self,
        token: &SpannedToken<'_>,
        _previous: Option<&Token<'_>>,
        [left, right]: [Option<Expression>; 2],
    ) -> ParseResult<Expression> {
        let left = require_operand(left, token)?;
        let right = require_operand(right, token)?;
        Ok(Expression::binary(self.op, left, right))
    }
}

/// `+` or `-`: prefix when nothing that ends an operand precedes it
pub struct SignOperator {
    tag: [&'static str; 1],
    name: &'static str,
    binary: BinaryOperator,
    unary: UnaryOperator,
}

impl SignOperator {
    pub const fn new(
        tag: &'static str,
        name: &'static str,
        binary: BinaryOperator,
        unary: UnaryOperator,
    ) -> Self {
        Self {
            tag: [tag],
            name,
            binary,
            unary,
        }
    }
}

impl ExpressionOperator for SignOperator {
    fn tags(&self) -> &[&'static str] {
        &self.tag
    }

    fn human_friendly_name(&self) -> &str {
        self.name
    }

    fn precedence(&self) -> Precedence {
        Precedence::Additive
    }

    fn is_unary(&self, previous: Option<&Token<'_>>) -> bool {
        previous.is_none_or(|token| !token.ends_operand())
    }

    fn build(
        &self,
        token: &SpannedToken<'_>,
        _previous: Option<&Token<'_>>,
        [left, right]: [Option<Expression>; 2],
    ) -> ParseResult<Expression> {
        let right = require_operand(right, token)?;
        Ok(match left {
            Some(left) => Expression::binary(self.binary, left, right),
            None => Expression::unary(self.unary, right),
        })
    }
}

/// Operator that is always prefix
pub struct PrefixOperator {
    tags: &'static [&'static str],
    name: &'static str,
    op: UnaryOperator,
}

impl PrefixOperator {
    pub const fn new(tags: &'static [&'static str], name: &'static str, op: UnaryOperator) -> Self {
        Self { tags, name, op }
    }
}

impl ExpressionOperator for PrefixOperator {
    fn tags(&self) -> &[&'static str] {
        self.tags
    }

    fn human_friendly_name(&self) -> &str {
        self.name
    }

    fn precedence(&self) -> Precedence {
        Precedence::Unary
    }

    fn is_unary(&self, _previous: Option<&Token<'_>>) -> bool {
        true
    }

    fn build(
        &self,
        token: &SpannedToken<'_>,
        _previous: Option<&Token<'_>>,
        [_, operand]: [Option<Expression>; 2],
    ) -> ParseResult<Expression> {
        Ok(Expression::unary(self.op, require_operand(operand, token)?))
    }
}

/// Register all built-in operators
pub fn register_builtin_operators(registry: &mut OperatorRegistry) {
    arithmetic::register_arithmetic_operators(registry);
    bitwise::register_bitwise_operators(registry);
    comparison::register_comparison_operators(registry);
    logical::register_logical_operators(registry);
}

/// Apply a binary operator to evaluated operands
///
/// `??` is lazy in its right operand and is handled by the evaluator before
/// operands are computed; here it only picks between two ready values.
pub fn evaluate_binary(
    op: BinaryOperator,
    left: &Value,
    right: &Value,
    strings: StringComparison,
) -> EvaluationResult<Value> {
    match op {
        BinaryOperator::Add => arithmetic::add(left, right),
        BinaryOperator::Subtract => arithmetic::subtract(left, right),
        BinaryOperator::Multiply => arithmetic::multiply(left, right),
        BinaryOperator::Divide => arithmetic::divide(left, right),
        BinaryOperator::Modulus => arithmetic::modulus(left, right),
        BinaryOperator::Exponent => arithmetic::exponent(left, right),
        BinaryOperator::BitwiseAnd => bitwise::bitwise_and(left, right),
        BinaryOperator::BitwiseOr => bitwise::bitwise_or(left, right),
        BinaryOperator::LeftShift => bitwise::left_shift(left, right),
        BinaryOperator::RightShift => bitwise::right_shift(left, right),
        BinaryOperator::Equal => Ok(comparison::equal(left, right, strings)),
        BinaryOperator::NotEqual => Ok(comparison::not_equal(left, right, strings)),
        BinaryOperator::LessThan => Ok(comparison::less_than(left, right, strings)),
        BinaryOperator::LessThanOrEqual => Ok(comparison::less_or_equal(left, right, strings)),
        BinaryOperator::GreaterThan => Ok(comparison::greater_than(left, right, strings)),
        BinaryOperator::GreaterThanOrEqual => {
            Ok(comparison::greater_or_equal(left, right, strings))
        }
        BinaryOperator::And => logical::and(left, right),
        BinaryOperator::Or => logical::or(left, right),
        BinaryOperator::NullCoalesce => Ok(if left.is_null() {
            right.clone()
        } else {
            left.clone()
        }),
    }
}

/// Apply a prefix operator to an evaluated operand
pub fn evaluate_unary(op: UnaryOperator, operand: &Value) -> EvaluationResult<Value> {
    match op {
        UnaryOperator::Minus => arithmetic::negate(operand),
        UnaryOperator::Plus => arithmetic::identity(operand),
        UnaryOperator::Not => logical::not(operand),
    }
}
