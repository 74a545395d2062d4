//! Built-in function library

pub mod conditional;
pub mod conversion;
pub mod css;
pub mod math;
pub mod statistical;
pub mod string;

pub use conditional::*;
pub use css::*;

use crate::evaluator::EvaluationResult;
use crate::model::Value;
use crate::registry::function::{Arity, FunctionArgs, FunctionDescriptor, FunctionRegistry};

/// Register a closure under `name` and `aliases`, replacing earlier holders
pub(crate) fn define<F>(
    registry: &mut FunctionRegistry,
    name: &str,
    aliases: &[&str],
    arity: Arity,
    documentation: &'static str,
    func: F,
) where
    F: Fn(&FunctionArgs<'_>) -> EvaluationResult<Value> + Send + Sync + 'static,
{
    let descriptor = FunctionDescriptor::from_closure(name, arity, documentation, func)
        .with_aliases(aliases.iter().copied());
    registry.register_forced(descriptor);
}

/// Register every built-in function
pub fn register_builtin_functions(registry: &mut FunctionRegistry) {
    css::register_css_functions(registry);
    conditional::register_conditional_functions(registry);
    math::register_math_functions(registry);
    statistical::register_statistical_functions(registry);
    string::register_string_functions(registry);
    conversion::register_conversion_functions(registry);
}
