//! rgb() function - builds a color from three channels

use crate::evaluator::{EvaluationError, EvaluationResult};
use crate::model::{Color, TypeCoercion, UnitKind, Value};
use crate::registry::function::{Arity, ExpressionFunction, FunctionArgs};

/// rgb() function
pub struct RgbFunction;

impl RgbFunction {
    fn channel(args: &FunctionArgs<'_>, index: usize) -> EvaluationResult<u8> {
        let value = args.evaluate(index)?;
        let level = match &value {
            Value::Unit(unit) if unit.kind == UnitKind::Percent => {
                (255.0 * unit.value / 100.0).round_ties_even() as i64
            }
            Value::Unit(unit) => {
                return Err(EvaluationError::UnsupportedUnit {
                    function: args.name().to_string(),
                    unit: unit.kind,
                });
            }
            other => TypeCoercion::to_rounded_integer(other)?,
        };
        Ok(level.clamp(0, 255) as u8)
    }
}

impl ExpressionFunction for RgbFunction {
    fn name(&self) -> &str {
        "Rgb"
    }

    fn aliases(&self) -> &[&'static str] {
        &["RGB", "rgb"]
    }

    fn arity(&self) -> Arity {
        Arity::at_most(3)
    }

    fn documentation(&self) -> &str {
        "Builds a color from red, green and blue channels. Channels are 0-255 numbers or percentages."
    }

    fn evaluate(&self, args: &FunctionArgs<'_>) -> EvaluationResult<Value> {
        let red = Self::channel(args, 0)?;
        let green = Self::channel(args, 1)?;
        let blue = Self::channel(args, 2)?;
        Ok(Value::Color(Color::rgb(red, green, blue)))
    }
}
