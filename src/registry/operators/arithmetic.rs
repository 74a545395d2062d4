//! Arithmetic operators: `+ - * / % ^` and prefix sign

use rust_decimal::Decimal;
use std::sync::Arc;

use super::{InfixOperator, SignOperator};
use crate::ast::{BinaryOperator, UnaryOperator};
use crate::evaluator::{EvaluationError, EvaluationResult};
use crate::model::{CoercionError, Number, TypeCoercion, Unit, Value};
use crate::registry::operator::{OperatorRegistry, Precedence};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,
}

impl ArithmeticOp {
    fn integer(self, a: i64, b: i64) -> Option<i64> {
        match self {
            ArithmeticOp::Add => a.checked_add(b),
            ArithmeticOp::Subtract => a.checked_sub(b),
            ArithmeticOp::Multiply => a.checked_mul(b),
            ArithmeticOp::Divide => a.checked_div(b),
            ArithmeticOp::Modulus => a.checked_rem(b),
        }
    }

    fn decimal(self, a: Decimal, b: Decimal) -> Option<Decimal> {
        match self {
            ArithmeticOp::Add => a.checked_add(b),
            ArithmeticOp::Subtract => a.checked_sub(b),
            ArithmeticOp::Multiply => a.checked_mul(b),
            ArithmeticOp::Divide => a.checked_div(b),
            ArithmeticOp::Modulus => a.checked_rem(b),
        }
    }

    fn double(self, a: f64, b: f64) -> f64 {
        match self {
            ArithmeticOp::Add => a + b,
            ArithmeticOp::Subtract => a - b,
            ArithmeticOp::Multiply => a * b,
            ArithmeticOp::Divide => a / b,
            ArithmeticOp::Modulus => a % b,
        }
    }

    fn single(self, a: f32, b: f32) -> f32 {
        match self {
            ArithmeticOp::Add => a + b,
            ArithmeticOp::Subtract => a - b,
            ArithmeticOp::Multiply => a * b,
            ArithmeticOp::Divide => a / b,
            ArithmeticOp::Modulus => a % b,
        }
    }
}

/// Apply `op` after promoting both numbers to their wider kind.
///
/// Integer overflow retries in decimal, decimal overflow retries in double.
fn apply(op: ArithmeticOp, left: Number, right: Number) -> Number {
    match Number::promote_pair(left, right) {
        (Number::Integer(a), Number::Integer(b)) => match op.integer(a, b) {
            Some(result) => Number::Integer(result),
            None => apply(op, Number::Decimal(Decimal::from(a)), Number::Decimal(Decimal::from(b))),
        },
        (Number::Decimal(a), Number::Decimal(b)) => match op.decimal(a, b) {
            Some(result) => Number::Decimal(result),
            None => Number::Double(op.double(left.to_f64(), right.to_f64())),
        },
        (Number::Single(a), Number::Single(b)) => Number::Single(op.single(a, b)),
        (a, b) => Number::Double(op.double(a.to_f64(), b.to_f64())),
    }
}

/// Both operands as numbers, or `None` when either is null
fn numbers(left: &Value, right: &Value) -> EvaluationResult<Option<(Number, Number)>> {
    let left = TypeCoercion::to_number(left)?;
    let right = TypeCoercion::to_number(right)?;
    Ok(left.zip(right))
}

fn numeric(op: ArithmeticOp, left: &Value, right: &Value) -> EvaluationResult<Value> {
    match numbers(left, right)? {
        Some((a, b)) => {
            if matches!(op, ArithmeticOp::Divide | ArithmeticOp::Modulus) && b.is_zero() {
                return Err(EvaluationError::DivisionByZero);
            }
            Ok(apply(op, a, b).into())
        }
        None => Ok(Value::Null),
    }
}

fn is_unit(value: &Value) -> bool {
    matches!(value, Value::Unit(_))
}

/// Bring a unit and its partner onto one kind. A plain number adopts the unit's kind.
fn unit_pair(left: &Value, right: &Value) -> EvaluationResult<(f64, f64, Unit)> {
    let as_unit = |value: &Value, other: &Unit| -> EvaluationResult<Unit> {
        match TypeCoercion::to_unit(value) {
            Some(unit) => Ok(unit),
            None => Ok(Unit::new(TypeCoercion::to_f64(value)?, other.kind)),
        }
    };
    let (a, b) = match (TypeCoercion::to_unit(left), TypeCoercion::to_unit(right)) {
        (Some(a), Some(b)) => (a, b),
        (Some(a), None) => (a, as_unit(right, &a)?),
        (None, Some(b)) => (as_unit(left, &b)?, b),
        (None, None) => return Err(CoercionError::invalid(left, "Unit").into()),
    };
    let (x, y, kind) = a.align(&b).ok_or(CoercionError::IncompatibleUnits {
        left: a.kind,
        right: b.kind,
    })?;
    Ok((x, y, Unit::new(0.0, kind)))
}

fn unit_additive(op: ArithmeticOp, left: &Value, right: &Value) -> EvaluationResult<Value> {
    if left.is_null() || right.is_null() {
        return Ok(Value::Null);
    }
    let (x, y, unit) = unit_pair(left, right)?;
    Ok(Value::Unit(unit.map(|_| op.double(x, y))))
}

/// `+`: concatenation when either side is a string, numeric addition otherwise
pub fn add(left: &Value, right: &Value) -> EvaluationResult<Value> {
    if is_unit(left) || is_unit(right) {
        let other = if is_unit(left) { right } else { left };
        if other.as_str().is_none() || TypeCoercion::to_unit(other).is_some() {
            return unit_additive(ArithmeticOp::Add, left, right);
        }
    }
    if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) {
        return Ok(Value::String(format!("{left}{right}")));
    }
    numeric(ArithmeticOp::Add, left, right)
}

pub fn subtract(left: &Value, right: &Value) -> EvaluationResult<Value> {
    if is_unit(left) || is_unit(right) {
        return unit_additive(ArithmeticOp::Subtract, left, right);
    }
    numeric(ArithmeticOp::Subtract, left, right)
}

/// Scale a unit by a plain number
fn scale(unit: &Unit, factor: &Value, op: ArithmeticOp) -> EvaluationResult<Value> {
    if factor.is_null() {
        return Ok(Value::Null);
    }
    if is_unit(factor) {
        return Err(CoercionError::invalid(factor, "Number").into());
    }
    let factor = TypeCoercion::to_f64(factor)?;
    if matches!(op, ArithmeticOp::Divide | ArithmeticOp::Modulus) && factor == 0.0 {
        return Err(EvaluationError::DivisionByZero);
    }
    Ok(Value::Unit(unit.map(|value| op.double(value, factor))))
}

pub fn multiply(left: &Value, right: &Value) -> EvaluationResult<Value> {
    match (left, right) {
        (Value::Unit(unit), factor) | (factor, Value::Unit(unit)) => {
            scale(unit, factor, ArithmeticOp::Multiply)
        }
        _ => numeric(ArithmeticOp::Multiply, left, right),
    }
}

/// `/`: real operands divide directly, integers divide as doubles
pub fn divide(left: &Value, right: &Value) -> EvaluationResult<Value> {
    match (left, right) {
        (Value::Unit(_), Value::Unit(_)) => {
            let (x, y, _) = unit_pair(left, right)?;
            if y == 0.0 {
                return Err(EvaluationError::DivisionByZero);
            }
            Ok(Value::Double(x / y))
        }
        (Value::Unit(unit), divisor) => scale(unit, divisor, ArithmeticOp::Divide),
        _ => match numbers(left, right)? {
            Some((a, b)) => {
                if b.is_zero() {
                    return Err(EvaluationError::DivisionByZero);
                }
                let a = if left.is_real() || right.is_real() {
                    a
                } else {
                    Number::Double(a.to_f64())
                };
                Ok(apply(ArithmeticOp::Divide, a, b).into())
            }
            None => Ok(Value::Null),
        },
    }
}

pub fn modulus(left: &Value, right: &Value) -> EvaluationResult<Value> {
    match left {
        Value::Unit(unit) => scale(unit, right, ArithmeticOp::Modulus),
        _ => numeric(ArithmeticOp::Modulus, left, right),
    }
}

/// `^`: always computed in double precision
pub fn exponent(left: &Value, right: &Value) -> EvaluationResult<Value> {
    if left.is_null() || right.is_null() {
        return Ok(Value::Null);
    }
    let base = TypeCoercion::to_f64(left)?;
    let power = TypeCoercion::to_f64(right)?;
    Ok(Value::Double(base.powf(power)))
}

/// Prefix `-`
pub fn negate(operand: &Value) -> EvaluationResult<Value> {
    if let Value::Unit(unit) = operand {
        return Ok(Value::Unit(unit.map(|value| -value)));
    }
    Ok(match TypeCoercion::to_number(operand)? {
        None => Value::Null,
        Some(Number::Integer(i)) => match i.checked_neg() {
            Some(negated) => Value::Integer(negated),
            None => Value::Decimal(-Decimal::from(i)),
        },
        Some(Number::Decimal(d)) => Value::Decimal(-d),
        Some(Number::Double(d)) => Value::Double(-d),
        Some(Number::Single(s)) => Value::Single(-s),
    })
}

/// Prefix `+`: adds zero, which turns numeric strings into numbers
pub fn identity(operand: &Value) -> EvaluationResult<Value> {
    if let Value::Unit(_) = operand {
        return Ok(operand.clone());
    }
    Ok(match TypeCoercion::to_number(operand)? {
        None => Value::Null,
        Some(number) => apply(ArithmeticOp::Add, Number::Integer(0), number).into(),
    })
}

pub(super) fn register_arithmetic_operators(registry: &mut OperatorRegistry) {
    registry.register_forced(Arc::new(SignOperator::new(
        "+",
        "Addition",
        BinaryOperator::Add,
        UnaryOperator::Plus,
    )));
    registry.register_forced(Arc::new(SignOperator::new(
        "-",
        "Subtraction",
        BinaryOperator::Subtract,
        UnaryOperator::Minus,
    )));
    registry.register_forced(Arc::new(InfixOperator::new(
        &["*"],
        "Multiplication",
        Precedence::Multiplicative,
        BinaryOperator::Multiply,
    )));
    registry.register_forced(Arc::new(InfixOperator::new(
        &["/"],
        "Division",
        Precedence::Multiplicative,
        BinaryOperator::Divide,
    )));
    registry.register_forced(Arc::new(InfixOperator::new(
        &["%"],
        "Modulus",
        Precedence::Multiplicative,
        BinaryOperator::Modulus,
    )));
    registry.register_forced(Arc::new(InfixOperator::new(
        &["^"],
        "Exponent",
        Precedence::Exponent,
        BinaryOperator::Exponent,
    )));
}
