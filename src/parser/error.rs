// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Parser error types

use std::borrow::Cow;
use thiserror::Error;

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Broad class of a [`ParseError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// Malformed token
    Lex,
    /// Malformed token sequence
    Syntax,
    /// Function called with an argument count outside its bounds
    Arity,
    /// An operator was left without a required operand
    MissingOperand,
}

/// Parse error with location information
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Character that cannot start any token
    #[error("Unrecognised character '{character}' at position {position}")]
    UnexpectedCharacter {
        /// The offending character
        character: char,
        /// Position of the character
        position: usize,
    },

    /// Unclosed string literal
    #[error("Unclosed string literal starting at position {position}")]
    UnclosedString {
        /// Position where the unclosed string started
        position: usize,
    },

    /// Invalid literal value
    #[error("Invalid {literal_type} literal '{value}' at position {position}")]
    InvalidLiteral {
        /// Type of literal that failed to parse
        literal_type: Cow<'static, str>,
        /// The invalid source text
        value: String,
        /// Position where the invalid literal was found
        position: usize,
    },

    /// Nothing to parse
    #[error("Expression is empty")]
    EmptyExpression,

    /// Parenthesis without a partner
    #[error("Unmatched '{delimiter}' at position {position}")]
    UnmatchedParenthesis {
        /// The unmatched delimiter
        delimiter: char,
        /// Position of the delimiter
        position: usize,
    },

    /// Token that does not fit the surrounding grammar
    #[error("Unexpected token '{token}' at position {position}")]
    UnexpectedToken {
        /// The unexpected token text
        token: String,
        /// Position where the token was found
        position: usize,
    },

    /// Operator symbol with no registered descriptor
    #[error("Unknown operator '{operator}' at position {position}")]
    UnknownOperator {
        /// The operator text
        operator: String,
        /// Position of the operator
        position: usize,
    },

    /// Call syntax naming an unregistered function
    #[error("Unknown function '{name}' at position {position}")]
    UnknownFunction {
        /// Name used in the call
        name: String,
        /// Position of the function name
        position: usize,
    },

    /// Operator without a required operand
    #[error("Missing operand for '{operator}' at position {position}")]
    MissingOperand {
        /// Operator or construct that lacks an operand
        operator: String,
        /// Position of the operator
        position: usize,
    },

    /// Function argument count outside the declared bounds
    #[error("Function '{name}' expects {} arguments, got {actual} (at position {position})", describe_arity(.min, .max))]
    InvalidArity {
        /// Function name
        name: String,
        /// Minimum argument count, `None` when unbounded
        min: Option<usize>,
        /// Maximum argument count, `None` when unbounded
        max: Option<usize>,
        /// Number of arguments supplied
        actual: usize,
        /// Position of the function name
        position: usize,
    },
}

/// Human readable arity range, e.g. `1 to 2` or `at least 2`
pub(crate) fn describe_arity(min: &Option<usize>, max: &Option<usize>) -> String {
    match (*min, *max) {
        (Some(min), Some(max)) if min == max => format!("{min}"),
        (Some(min), Some(max)) => format!("{min} to {max}"),
        (Some(min), None) => format!("at least {min}"),
        (None, Some(max)) => format!("at most {max}"),
        (None, None) => "any number of".to_string(),
    }
}

impl ParseError {
    /// Taxonomy class of this error
    pub fn kind(&self) -> ParseErrorKind {
        match self {
            Self::UnexpectedCharacter { .. }
            | Self::UnclosedString { .. }
            | Self::InvalidLiteral { .. } => ParseErrorKind::Lex,
            Self::EmptyExpression
            | Self::UnmatchedParenthesis { .. }
            | Self::UnexpectedToken { .. }
            | Self::UnknownOperator { .. }
            | Self::UnknownFunction { .. } => ParseErrorKind::Syntax,
            Self::InvalidArity { .. } => ParseErrorKind::Arity,
            Self::MissingOperand { .. } => ParseErrorKind::MissingOperand,
        }
    }

    /// Byte offset in the source the error refers to
    pub fn position(&self) -> usize {
        match self {
            Self::EmptyExpression => 0,
            Self::UnexpectedCharacter { position, .. }
            | Self::UnclosedString { position }
            | Self::InvalidLiteral { position, .. }
            | Self::UnmatchedParenthesis { position, .. }
            | Self::UnexpectedToken { position, .. }
            | Self::UnknownOperator { position, .. }
            | Self::UnknownFunction { position, .. }
            | Self::MissingOperand { position, .. }
            | Self::InvalidArity { position, .. } => *position,
        }
    }

    pub fn is_lex_error(&self) -> bool {
        self.kind() == ParseErrorKind::Lex
    }

    pub fn is_syntax_error(&self) -> bool {
        self.kind() == ParseErrorKind::Syntax
    }

    pub fn is_arity_error(&self) -> bool {
        self.kind() == ParseErrorKind::Arity
    }

    pub fn is_missing_operand(&self) -> bool {
        self.kind() == ParseErrorKind::MissingOperand
    }
}
