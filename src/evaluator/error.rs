// Error types for expression evaluation

use thiserror::Error;

use crate::model::{CoercionError, UnitKind};

/// Result type for evaluation operations
pub type EvaluationResult<T> = Result<T, EvaluationError>;

/// Errors that can occur during expression evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// A value could not be read as the type an operation needs
    #[error("Type coercion error: {0}")]
    TypeCoercion(#[from] CoercionError),

    /// A dimensional value whose unit the function cannot use
    #[error("Function '{function}' does not support '{unit}' values")]
    UnsupportedUnit {
        /// Function name
        function: String,
        /// The rejected unit
        unit: UnitKind,
    },

    /// An argument or operand that was not supplied
    #[error("Missing operand {index} for '{function}'")]
    MissingOperand {
        /// Function or operator that asked for the operand
        function: String,
        /// Zero-based operand index
        index: usize,
    },

    /// Division or modulus by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Failure raised by a function body
    #[error("Error in function '{name}': {message}")]
    Function {
        /// Function name
        name: String,
        /// Error message
        message: String,
    },
}

impl EvaluationError {
    /// Whether `??` treats this error as a null left operand
    pub fn is_missing_operand(&self) -> bool {
        matches!(self, EvaluationError::MissingOperand { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;

    #[test]
    fn test_messages() {
        let err = EvaluationError::UnsupportedUnit {
            function: "Rgb".to_string(),
            unit: UnitKind::Pixel,
        };
        assert_eq!(err.to_string(), "Function 'Rgb' does not support 'px' values");

        let err: EvaluationError = CoercionError::invalid(&Value::from("abc"), "Number").into();
        assert_eq!(
            err.to_string(),
            "Type coercion error: Cannot convert String 'abc' to Number"
        );
        assert!(!err.is_missing_operand());
    }
}
