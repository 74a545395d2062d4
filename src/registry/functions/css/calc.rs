//! calc() function - identity over its single argument

use crate::evaluator::EvaluationResult;
use crate::model::Value;
use crate::registry::function::{Arity, ExpressionFunction, FunctionArgs};

/// calc() function
pub struct CalcFunction;

impl ExpressionFunction for CalcFunction {
    fn name(&self) -> &str {
        "Calc"
    }

    fn aliases(&self) -> &[&'static str] {
        &["calc"]
    }

    fn arity(&self) -> Arity {
        Arity::exactly(1)
    }

    fn documentation(&self) -> &str {
        "Returns the value of its argument unchanged, so `calc(100% - 2 * 10pt)` evaluates the inner expression."
    }

    fn evaluate(&self, args: &FunctionArgs<'_>) -> EvaluationResult<Value> {
        args.evaluate(0)
    }
}
