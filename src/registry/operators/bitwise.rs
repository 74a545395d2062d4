//! Bitwise operators over unsigned 32-bit operands

use std::sync::Arc;

use super::InfixOperator;
use crate::ast::BinaryOperator;
use crate::evaluator::EvaluationResult;
use crate::model::{TypeCoercion, Value};
use crate::registry::operator::{OperatorRegistry, Precedence};

fn apply(left: &Value, right: &Value, op: impl FnOnce(u32, u32) -> u32) -> EvaluationResult<Value> {
    let a = TypeCoercion::to_u32(left)?;
    let b = TypeCoercion::to_u32(right)?;
    Ok(Value::Integer(i64::from(op(a, b))))
}

pub fn bitwise_and(left: &Value, right: &Value) -> EvaluationResult<Value> {
    apply(left, right, |a, b| a & b)
}

pub fn bitwise_or(left: &Value, right: &Value) -> EvaluationResult<Value> {
    apply(left, right, |a, b| a | b)
}

/// `<<`; shifting every bit out yields zero
pub fn left_shift(left: &Value, right: &Value) -> EvaluationResult<Value> {
    apply(left, right, |a, b| a.checked_shl(b).unwrap_or(0))
}

pub fn right_shift(left: &Value, right: &Value) -> EvaluationResult<Value> {
    apply(left, right, |a, b| a.checked_shr(b).unwrap_or(0))
}

pub(super) fn register_bitwise_operators(registry: &mut OperatorRegistry) {
    const OPERATORS: [(&[&str], &str, BinaryOperator); 4] = [
        (&["&"], "Bitwise And", BinaryOperator::BitwiseAnd),
        (&["|"], "Bitwise Or", BinaryOperator::BitwiseOr),
        (&["<<"], "Left Shift", BinaryOperator::LeftShift),
        (&[">>"], "Right Shift", BinaryOperator::RightShift),
    ];
    for (tags, name, op) in OPERATORS {
        registry.register_forced(Arc::new(InfixOperator::new(
            tags,
            name,
            Precedence::Bitwise,
            op,
        )));
    }
}
