//! Index() function - current iteration index

use crate::evaluator::EvaluationResult;
use crate::model::{INDEX_VARIABLE, Value, VariableProvider};
use crate::registry::function::{Arity, ExpressionFunction, FunctionArgs};

/// Index() function
pub struct IndexFunction;

impl ExpressionFunction for IndexFunction {
    fn name(&self) -> &str {
        "Index"
    }

    fn aliases(&self) -> &[&'static str] {
        &["index"]
    }

    fn arity(&self) -> Arity {
        Arity::exactly(0)
    }

    fn documentation(&self) -> &str {
        "Returns the value bound to `$index`, or -1 outside of an iteration."
    }

    fn evaluate(&self, args: &FunctionArgs<'_>) -> EvaluationResult<Value> {
        Ok(args
            .variables()
            .get_variable(INDEX_VARIABLE)
            .map(|value| value.into_owned())
            .unwrap_or(Value::Integer(-1)))
    }
}
