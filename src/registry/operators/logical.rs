//! Logical operators and null coalescing
//!
//! `and`/`or` evaluate both operands; they do not short-circuit.

use std::sync::Arc;

use super::{InfixOperator, PrefixOperator};
use crate::ast::{BinaryOperator, UnaryOperator};
use crate::evaluator::EvaluationResult;
use crate::model::{TypeCoercion, Value};
use crate::registry::operator::{OperatorRegistry, Precedence};

pub fn and(left: &Value, right: &Value) -> EvaluationResult<Value> {
    let left = TypeCoercion::to_boolean(left)?;
    let right = TypeCoercion::to_boolean(right)?;
    Ok(Value::Boolean(left && right))
}

pub fn or(left: &Value, right: &Value) -> EvaluationResult<Value> {
    let left = TypeCoercion::to_boolean(left)?;
    let right = TypeCoercion::to_boolean(right)?;
    Ok(Value::Boolean(left || right))
}

pub fn not(operand: &Value) -> EvaluationResult<Value> {
    Ok(Value::Boolean(!TypeCoercion::to_boolean(operand)?))
}

pub(super) fn register_logical_operators(registry: &mut OperatorRegistry) {
    registry.register_forced(Arc::new(InfixOperator::new(
        &["&&", "and"],
        "Logical And",
        Precedence::Logical,
        BinaryOperator::And,
    )));
    registry.register_forced(Arc::new(InfixOperator::new(
        &["||", "or"],
        "Logical Or",
        Precedence::Logical,
        BinaryOperator::Or,
    )));
    registry.register_forced(Arc::new(PrefixOperator::new(
        &["!", "not"],
        "Logical Not",
        UnaryOperator::Not,
    )));
    registry.register_forced(Arc::new(InfixOperator::new(
        &["??"],
        "Null Coalescing",
        Precedence::NullCoalescing,
        BinaryOperator::NullCoalesce,
    )));
}
