//! Crate level error type

use thiserror::Error;

use crate::evaluator::EvaluationError;
use crate::parser::ParseError;

/// Result of parsing and evaluating in one step
pub type ExpressionResult<T> = Result<T, ExpressionError>;

/// Failure of either phase of [`ExpressionEngine::evaluate`](crate::ExpressionEngine::evaluate)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    /// The text could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// The parsed expression failed to evaluate
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),
}

impl ExpressionError {
    /// Byte offset of a parse error; evaluation errors carry no position
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Parse(err) => Some(err.position()),
            Self::Evaluation(_) => None,
        }
    }
}
