//! Expression evaluator
//!
//! Walks an [`Expression`] tree against a set of variable bindings. Operators
//! evaluate both operands before applying, except `??`, which only evaluates
//! its right side when the left side is null. Function calls hand their
//! unevaluated arguments to the resolved function.

mod error;

pub use error::{EvaluationError, EvaluationResult};

use crate::ast::{BinaryOperator, Expression};
use crate::context::Context;
use crate::model::{Value, VariableProvider};
use crate::registry::function::FunctionArgs;
use crate::registry::operators;

/// Evaluation state for a single run over one tree
///
/// Holds only borrowed data, so it is created per call and never shared.
pub struct Evaluator<'a> {
    variables: &'a dyn VariableProvider,
    context: &'a Context,
}

impl<'a> Evaluator<'a> {
    pub fn new(variables: &'a dyn VariableProvider, context: &'a Context) -> Self {
        Self { variables, context }
    }

    /// Bindings visible to this evaluation
    pub fn variables(&self) -> &'a dyn VariableProvider {
        self.variables
    }

    pub fn context(&self) -> &'a Context {
        self.context
    }

    /// Evaluate `expression` to a value
    pub fn evaluate(&self, expression: &Expression) -> EvaluationResult<Value> {
        match expression {
            Expression::Literal(value) => Ok(value.clone()),
            Expression::Variable(name) => Ok(self
                .variables
                .get_variable(name)
                .map(|value| value.into_owned())
                .unwrap_or(Value::Null)),
            Expression::Unary { op, operand } => {
                let operand = self.evaluate(operand)?;
                operators::evaluate_unary(*op, &operand)
            }
            Expression::Binary(data) if data.op == BinaryOperator::NullCoalesce => {
                let left = match self.evaluate(&data.left) {
                    Ok(value) => value,
                    Err(err) if err.is_missing_operand() => Value::Null,
                    Err(err) => return Err(err),
                };
                if left.is_null() {
                    self.evaluate(&data.right)
                } else {
                    Ok(left)
                }
            }
            Expression::Binary(data) => {
                let left = self.evaluate(&data.left)?;
                let right = self.evaluate(&data.right)?;
                operators::evaluate_binary(
                    data.op,
                    &left,
                    &right,
                    self.context.string_comparison(),
                )
            }
            Expression::Call(data) => {
                log::trace!("Calling {} with {} arguments", data.name, data.args.len());
                let args = FunctionArgs::new(&data.name, &data.args, self);
                data.function.invoke(&args)
            }
        }
    }
}

/// Evaluate `expression` once with the given bindings
pub fn evaluate(
    expression: &Expression,
    variables: &dyn VariableProvider,
    context: &Context,
) -> EvaluationResult<Value> {
    Evaluator::new(variables, context).evaluate(expression)
}
