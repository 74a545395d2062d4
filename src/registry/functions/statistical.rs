//! Statistical aggregates over flattened arguments

use super::define;
use super::math::{numeric_values, sum_values};
use crate::evaluator::EvaluationResult;
use crate::model::{TypeCoercion, Value};
use crate::registry::function::{Arity, FunctionArgs, FunctionRegistry};
use crate::registry::operators::arithmetic;

fn average(args: &FunctionArgs<'_>) -> EvaluationResult<Value> {
    let values = numeric_values(args)?;
    if values.is_empty() {
        return Ok(Value::Null);
    }
    let count = Value::Integer(values.len() as i64);
    arithmetic::divide(&sum_values(&values)?, &count)
}

fn median(args: &FunctionArgs<'_>) -> EvaluationResult<Value> {
    let strings = args.context().string_comparison();
    let mut values = numeric_values(args)?;
    if values.is_empty() {
        return Ok(Value::Null);
    }
    values.sort_by(|a, b| TypeCoercion::compare(a, b, strings));
    let middle = values.len() / 2;
    if values.len() % 2 == 1 {
        return Ok(values.swap_remove(middle));
    }
    let pair = arithmetic::add(&values[middle - 1], &values[middle])?;
    arithmetic::divide(&pair, &Value::Integer(2))
}

/// Register the statistical functions
pub fn register_statistical_functions(registry: &mut FunctionRegistry) {
    define(
        registry,
        "Average",
        &["average", "Avg", "avg", "Mean", "mean"],
        Arity::at_least(1),
        "Arithmetic mean of the arguments; sequences are flattened and nulls ignored.",
        average,
    );
    define(
        registry,
        "Median",
        &["median"],
        Arity::at_least(1),
        "Middle value of the sorted arguments, or the mean of the two middle values.",
        median,
    );
    define(
        registry,
        "Count",
        &["count"],
        Arity::at_least(1),
        "Number of non-null values; sequences are flattened.",
        |args| {
            let values = TypeCoercion::flatten(&args.evaluate_all()?);
            Ok(Value::Integer(
                values.iter().filter(|value| !value.is_null()).count() as i64,
            ))
        },
    );
}
