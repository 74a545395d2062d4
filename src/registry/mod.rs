//! Function and operator registries
//!
//! Registries are plain maps filled before a [`Context`](crate::Context) is
//! built; once built they are only read, so lookups need no locking.

pub mod error;
pub mod function;
pub mod functions;
pub mod operator;
pub mod operators;

pub use error::{RegistryError, RegistryResult};
pub use function::{
    Arity, ExpressionFunction, FunctionArgs, FunctionDescriptor, FunctionImpl, FunctionRegistry,
};
pub use operator::{ExpressionOperator, OperatorRegistry, Precedence};

/// Create registries holding all built-in functions and operators
pub fn create_standard_registries() -> (FunctionRegistry, OperatorRegistry) {
    create_registries(false)
}

/// Create standard registries, optionally matching names and word operators regardless of case
pub fn create_registries(ignore_case: bool) -> (FunctionRegistry, OperatorRegistry) {
    let (mut functions, mut operators) = if ignore_case {
        (
            FunctionRegistry::case_insensitive(),
            OperatorRegistry::case_insensitive(),
        )
    } else {
        (FunctionRegistry::new(), OperatorRegistry::new())
    };

    functions::register_builtin_functions(&mut functions);
    operators::register_builtin_operators(&mut operators);

    (functions, operators)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registries() {
        let (functions, operators) = create_standard_registries();
        for name in ["Calc", "var", "RGB", "iif", "iferror", "In", "index", "Round"] {
            assert!(functions.contains(name), "missing function {name}");
        }
        for tag in ["+", "-", "^", "??", "<>", "=", "and", "not", "<<"] {
            assert!(operators.contains(tag), "missing operator {tag}");
        }
        assert!(!functions.contains("CALC"));
        assert!(!operators.contains("AND"));
    }

    #[test]
    fn test_case_insensitive_registries() {
        let (functions, operators) = create_registries(true);
        assert!(functions.contains("CALC"));
        assert!(functions.contains("startswith"));
        assert!(operators.contains("AND"));
    }
}
