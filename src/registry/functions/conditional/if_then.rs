//! If() function - conditional expression (if-then-else)

use crate::evaluator::EvaluationResult;
use crate::model::{TypeCoercion, Value};
use crate::registry::function::{Arity, ExpressionFunction, FunctionArgs};

/// If() function
pub struct IfFunction;

impl ExpressionFunction for IfFunction {
    fn name(&self) -> &str {
        "If"
    }

    fn aliases(&self) -> &[&'static str] {
        &["if", "iif"]
    }

    fn arity(&self) -> Arity {
        Arity::exactly(3)
    }

    fn documentation(&self) -> &str {
        "Returns `then` if `condition` is true, or `else` otherwise. The branch that is not taken is never evaluated."
    }

    fn evaluate(&self, args: &FunctionArgs<'_>) -> EvaluationResult<Value> {
        let condition = TypeCoercion::to_boolean(&args.evaluate(0)?)?;
        args.evaluate(if condition { 1 } else { 2 })
    }
}
