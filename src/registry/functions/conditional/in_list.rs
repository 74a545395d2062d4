//! In() function - membership test

use crate::evaluator::EvaluationResult;
use crate::model::{StringComparison, TypeCoercion, Value};
use crate::registry::function::{Arity, ExpressionFunction, FunctionArgs};

/// In() function
pub struct InFunction;

impl InFunction {
    /// Whether `candidate` matches `probe`. Sequences are searched recursively;
    /// the probe itself is compared as-is.
    fn matches(candidate: &Value, probe: &Value, strings: StringComparison) -> bool {
        match candidate {
            Value::String(text) => strings.equals(text, &probe.to_string()),
            Value::Sequence(items) => items
                .iter()
                .any(|item| Self::matches(item, probe, strings)),
            other => TypeCoercion::values_equal(other, probe, strings),
        }
    }
}

impl ExpressionFunction for InFunction {
    fn name(&self) -> &str {
        "In"
    }

    fn aliases(&self) -> &[&'static str] {
        &["in"]
    }

    fn arity(&self) -> Arity {
        Arity::any()
    }

    fn documentation(&self) -> &str {
        "Returns true if the first argument equals any of the remaining arguments. Sequence arguments are searched element by element."
    }

    fn evaluate(&self, args: &FunctionArgs<'_>) -> EvaluationResult<Value> {
        let probe = args.evaluate(0)?;
        let strings = args.context().string_comparison();
        for index in 1..args.len() {
            if Self::matches(&args.evaluate(index)?, &probe, strings) {
                return Ok(Value::Boolean(true));
            }
        }
        Ok(Value::Boolean(false))
    }
}
