//! var() function - value with fallback

use crate::evaluator::EvaluationResult;
use crate::model::Value;
use crate::registry::function::{Arity, ExpressionFunction, FunctionArgs};

/// var() function
pub struct VarFunction;

impl ExpressionFunction for VarFunction {
    fn name(&self) -> &str {
        "Var"
    }

    fn aliases(&self) -> &[&'static str] {
        &["var"]
    }

    fn arity(&self) -> Arity {
        Arity::at_most(2)
    }

    fn documentation(&self) -> &str {
        "Returns the first argument, or the second argument when the first is null. The fallback is only evaluated when it is used."
    }

    fn evaluate(&self, args: &FunctionArgs<'_>) -> EvaluationResult<Value> {
        let value = args.evaluate(0)?;
        if value.is_null() && args.len() > 1 {
            return args.evaluate(1);
        }
        Ok(value)
    }
}
