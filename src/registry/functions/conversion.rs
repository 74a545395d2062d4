//! Type conversion functions
//!
//! Null converts to null; every other failure is a coercion error.

use super::define;
use crate::evaluator::EvaluationResult;
use crate::model::{TypeCoercion, Value};
use crate::registry::function::{Arity, FunctionArgs, FunctionRegistry};

/// Evaluate the single argument and convert it unless it is null
fn convert(
    args: &FunctionArgs<'_>,
    op: impl FnOnce(&Value) -> EvaluationResult<Value>,
) -> EvaluationResult<Value> {
    let value = args.evaluate(0)?;
    if value.is_null() {
        return Ok(Value::Null);
    }
    op(&value)
}

/// Register the conversion functions
pub fn register_conversion_functions(registry: &mut FunctionRegistry) {
    define(
        registry,
        "String",
        &["string", "ToString", "toString"],
        Arity::exactly(1),
        "Textual form of the argument.",
        |args| convert(args, |value| Ok(Value::String(value.to_string()))),
    );
    define(
        registry,
        "Integer",
        &["integer", "Int", "int"],
        Arity::exactly(1),
        "Converts to an integer, rounding real numbers.",
        |args| {
            convert(args, |value| {
                Ok(Value::Integer(TypeCoercion::to_rounded_integer(value)?))
            })
        },
    );
    define(
        registry,
        "Decimal",
        &["decimal"],
        Arity::exactly(1),
        "Converts to an exact decimal.",
        |args| convert(args, |value| Ok(Value::Decimal(TypeCoercion::to_decimal(value)?))),
    );
    define(
        registry,
        "Double",
        &["double"],
        Arity::exactly(1),
        "Converts to a double precision number.",
        |args| convert(args, |value| Ok(Value::Double(TypeCoercion::to_f64(value)?))),
    );
    define(
        registry,
        "Boolean",
        &["boolean", "Bool", "bool"],
        Arity::exactly(1),
        "Converts to a boolean. Accepts true/false, yes/no and 1/0 strings.",
        |args| convert(args, |value| Ok(Value::Boolean(TypeCoercion::to_boolean(value)?))),
    );
    define(
        registry,
        "TypeOf",
        &["typeOf", "typeof"],
        Arity::exactly(1),
        "Name of the argument's value kind, e.g. `Integer` or `Unit`.",
        |args| Ok(Value::string(args.evaluate(0)?.type_name())),
    );
}
