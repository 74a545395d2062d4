//! Mathematical functions
//!
//! Null arguments yield null. Rounding functions keep the numeric kind of
//! their argument; transcendental functions always return doubles.

use rust_decimal::Decimal;
use std::cmp::Ordering;

use super::define;
use crate::evaluator::EvaluationResult;
use crate::model::{Number, TypeCoercion, Value};
use crate::registry::function::{Arity, FunctionArgs, FunctionRegistry};
use crate::registry::operators::arithmetic;

/// Largest scale a decimal can be rounded to
const MAX_DECIMAL_DIGITS: i64 = 28;

/// Flattened, non-null arguments; numeric strings become numbers
pub(crate) fn numeric_values(args: &FunctionArgs<'_>) -> EvaluationResult<Vec<Value>> {
    let mut values = Vec::new();
    for value in TypeCoercion::flatten(&args.evaluate_all()?) {
        match value {
            Value::Null => {}
            Value::Unit(_) => values.push(value),
            other => {
                if let Some(number) = TypeCoercion::to_number(&other)? {
                    values.push(number.into());
                }
            }
        }
    }
    Ok(values)
}

/// Sum of already numeric values, integer zero for none
pub(crate) fn sum_values(values: &[Value]) -> EvaluationResult<Value> {
    let mut iter = values.iter();
    let Some(first) = iter.next() else {
        return Ok(Value::Integer(0));
    };
    iter.try_fold(first.clone(), |total, value| arithmetic::add(&total, value))
}

fn extreme(args: &FunctionArgs<'_>, wanted: Ordering) -> EvaluationResult<Value> {
    let strings = args.context().string_comparison();
    let values = numeric_values(args)?;
    Ok(values
        .into_iter()
        .reduce(|best, value| {
            if TypeCoercion::compare(&value, &best, strings) == wanted {
                value
            } else {
                best
            }
        })
        .unwrap_or(Value::Null))
}

/// Apply a kind-preserving rounding operation
fn round_with(
    value: &Value,
    decimal: impl Fn(Decimal) -> Decimal,
    double: impl Fn(f64) -> f64,
) -> EvaluationResult<Value> {
    if let Value::Unit(unit) = value {
        return Ok(Value::Unit(unit.map(&double)));
    }
    Ok(match TypeCoercion::to_number(value)? {
        None => Value::Null,
        Some(Number::Integer(i)) => Value::Integer(i),
        Some(Number::Decimal(d)) => Value::Decimal(decimal(d)),
        Some(Number::Double(d)) => Value::Double(double(d)),
        Some(Number::Single(s)) => Value::Single(double(f64::from(s)) as f32),
    })
}

fn define_rounding(
    registry: &mut FunctionRegistry,
    name: &str,
    alias: &str,
    documentation: &'static str,
    decimal: fn(&Decimal) -> Decimal,
    double: fn(f64) -> f64,
) {
    define(registry, name, &[alias], Arity::exactly(1), documentation, move |args| {
        round_with(&args.evaluate(0)?, |d| decimal(&d), double)
    });
}

fn define_transcendental(
    registry: &mut FunctionRegistry,
    name: &str,
    alias: &str,
    documentation: &'static str,
    op: fn(f64) -> f64,
) {
    define(registry, name, &[alias], Arity::exactly(1), documentation, move |args| {
        let value = args.evaluate(0)?;
        if value.is_null() {
            return Ok(Value::Null);
        }
        Ok(Value::Double(op(TypeCoercion::to_f64(&value)?)))
    });
}

fn abs(value: &Value) -> EvaluationResult<Value> {
    if let Value::Unit(unit) = value {
        return Ok(Value::Unit(unit.map(f64::abs)));
    }
    Ok(match TypeCoercion::to_number(value)? {
        None => Value::Null,
        Some(Number::Integer(i)) => match i.checked_abs() {
            Some(abs) => Value::Integer(abs),
            None => Value::Decimal(Decimal::from(i).abs()),
        },
        Some(Number::Decimal(d)) => Value::Decimal(d.abs()),
        Some(Number::Double(d)) => Value::Double(d.abs()),
        Some(Number::Single(s)) => Value::Single(s.abs()),
    })
}

/// Round half to even at `digits` decimal places
fn round(value: &Value, digits: u32) -> EvaluationResult<Value> {
    let factor = 10f64.powi(digits as i32);
    round_with(
        value,
        |d| d.round_dp(digits),
        |f| (f * factor).round_ties_even() / factor,
    )
}

fn sign(value: &Value) -> EvaluationResult<Value> {
    let number = match value {
        Value::Unit(unit) => Some(Number::Double(unit.value)),
        other => TypeCoercion::to_number(other)?,
    };
    Ok(match number {
        None => Value::Null,
        Some(number) => Value::Integer(number.compare(Number::Integer(0)) as i64),
    })
}

/// Register the math functions
pub fn register_math_functions(registry: &mut FunctionRegistry) {
    define(
        registry,
        "Abs",
        &["abs"],
        Arity::exactly(1),
        "Returns the absolute value of a number or dimension.",
        |args| abs(&args.evaluate(0)?),
    );
    define_rounding(
        registry,
        "Ceiling",
        "ceiling",
        "Returns the smallest whole number greater than or equal to the argument.",
        Decimal::ceil,
        f64::ceil,
    );
    define_rounding(
        registry,
        "Floor",
        "floor",
        "Returns the largest whole number less than or equal to the argument.",
        Decimal::floor,
        f64::floor,
    );
    define_rounding(
        registry,
        "Truncate",
        "truncate",
        "Removes the fractional part of the argument.",
        Decimal::trunc,
        f64::trunc,
    );
    define(
        registry,
        "Round",
        &["round"],
        Arity::range(1, 2),
        "Rounds to the given number of decimal places (default 0), half to even.",
        |args| {
            let digits = match args.evaluate_optional(1)? {
                Some(digits) => TypeCoercion::to_rounded_integer(&digits)?,
                None => 0,
            };
            round(&args.evaluate(0)?, digits.clamp(0, MAX_DECIMAL_DIGITS) as u32)
        },
    );
    define(
        registry,
        "Sign",
        &["sign"],
        Arity::exactly(1),
        "Returns -1, 0 or 1 according to the sign of the argument.",
        |args| sign(&args.evaluate(0)?),
    );
    define_transcendental(registry, "Sqrt", "sqrt", "Square root.", f64::sqrt);
    define_transcendental(registry, "Exp", "exp", "Returns e raised to the argument.", f64::exp);
    define_transcendental(registry, "Log10", "log10", "Base 10 logarithm.", f64::log10);
    define_transcendental(registry, "Sin", "sin", "Sine of an angle in radians.", f64::sin);
    define_transcendental(registry, "Cos", "cos", "Cosine of an angle in radians.", f64::cos);
    define_transcendental(registry, "Tan", "tan", "Tangent of an angle in radians.", f64::tan);
    define_transcendental(registry, "Asin", "asin", "Arc sine, in radians.", f64::asin);
    define_transcendental(registry, "Acos", "acos", "Arc cosine, in radians.", f64::acos);
    define_transcendental(registry, "Atan", "atan", "Arc tangent, in radians.", f64::atan);
    define(
        registry,
        "Log",
        &["log"],
        Arity::range(1, 2),
        "Natural logarithm, or the logarithm in the base given as second argument.",
        |args| {
            let value = args.evaluate(0)?;
            if value.is_null() {
                return Ok(Value::Null);
            }
            let value = TypeCoercion::to_f64(&value)?;
            Ok(Value::Double(match args.evaluate_optional(1)? {
                Some(base) => value.log(TypeCoercion::to_f64(&base)?),
                None => value.ln(),
            }))
        },
    );
    define(
        registry,
        "Pow",
        &["pow"],
        Arity::exactly(2),
        "Raises the first argument to the power of the second.",
        |args| arithmetic::exponent(&args.evaluate(0)?, &args.evaluate(1)?),
    );
    define(registry, "PI", &["pi", "Pi"], Arity::exactly(0), "The constant pi.", |_| {
        Ok(Value::Double(std::f64::consts::PI))
    });
    define(registry, "E", &["e"], Arity::exactly(0), "The constant e.", |_| {
        Ok(Value::Double(std::f64::consts::E))
    });
    define(
        registry,
        "Max",
        &["max"],
        Arity::at_least(1),
        "Largest of the arguments; sequences are flattened and nulls ignored.",
        |args| extreme(args, Ordering::Greater),
    );
    define(
        registry,
        "Min",
        &["min"],
        Arity::at_least(1),
        "Smallest of the arguments; sequences are flattened and nulls ignored.",
        |args| extreme(args, Ordering::Less),
    );
    define(
        registry,
        "Sum",
        &["sum"],
        Arity::at_least(1),
        "Sum of the arguments; sequences are flattened and nulls ignored.",
        |args| sum_values(&numeric_values(args)?),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Unit, UnitKind};
    use std::str::FromStr;

    #[test]
    fn test_round_half_to_even() {
        assert_eq!(round(&Value::Double(2.5), 0).unwrap(), Value::Double(2.0));
        assert_eq!(round(&Value::Double(1.25), 1).unwrap(), Value::Double(1.2));
        assert_eq!(
            round(&Value::Decimal(Decimal::from_str("1.35").unwrap()), 1).unwrap(),
            Value::Decimal(Decimal::from_str("1.4").unwrap())
        );
        assert_eq!(round(&Value::Integer(7), 2).unwrap(), Value::Integer(7));
        assert_eq!(round(&Value::Null, 0).unwrap(), Value::Null);
    }

    #[test]
    fn test_abs_and_sign() {
        assert_eq!(abs(&Value::Integer(-3)).unwrap(), Value::Integer(3));
        assert_eq!(
            abs(&Value::Unit(Unit::new(-2.0, UnitKind::Millimetre))).unwrap(),
            Value::Unit(Unit::new(2.0, UnitKind::Millimetre))
        );
        assert_eq!(sign(&Value::Double(-0.5)).unwrap(), Value::Integer(-1));
        assert_eq!(sign(&"12".into()).unwrap(), Value::Integer(1));
    }

    #[test]
    fn test_sum_values() {
        assert_eq!(sum_values(&[]).unwrap(), Value::Integer(0));
        assert_eq!(
            sum_values(&[Value::Integer(1), Value::Double(0.5)]).unwrap(),
            Value::Double(1.5)
        );
    }
}
