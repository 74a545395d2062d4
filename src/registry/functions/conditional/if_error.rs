//! IfError() function - fallback on evaluation failure

use crate::evaluator::EvaluationResult;
use crate::model::Value;
use crate::registry::function::{Arity, ExpressionFunction, FunctionArgs};

/// IfError() function
pub struct IfErrorFunction;

impl ExpressionFunction for IfErrorFunction {
    fn name(&self) -> &str {
        "IfError"
    }

    fn aliases(&self) -> &[&'static str] {
        &["ifError", "iferror"]
    }

    fn arity(&self) -> Arity {
        Arity::exactly(2)
    }

    fn documentation(&self) -> &str {
        "Returns the first argument, or the second argument if evaluating the first raised any error."
    }

    fn evaluate(&self, args: &FunctionArgs<'_>) -> EvaluationResult<Value> {
        match args.evaluate(0) {
            Ok(value) => Ok(value),
            Err(err) => {
                log::debug!("{}: falling back after error: {err}", args.name());
                args.evaluate(1)
            }
        }
    }
}
