//! Registration errors

use thiserror::Error;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors raised while populating registries
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A function name or alias is already taken
    #[error("Function '{name}' is already registered")]
    DuplicateFunction {
        /// The conflicting name
        name: String,
    },

    /// An operator tag is already taken
    #[error("Operator '{tag}' is already registered")]
    DuplicateOperator {
        /// The conflicting tag
        tag: String,
    },
}
