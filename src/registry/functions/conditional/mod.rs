//! Conditional and membership functions
//!
//! These rely on lazy arguments: `If` evaluates only the taken branch and
//! `IfError` evaluates its fallback only after the first argument failed.

mod if_error;
mod if_then;
mod in_list;
mod index;

pub use if_error::IfErrorFunction;
pub use if_then::IfFunction;
pub use in_list::InFunction;
pub use index::IndexFunction;

use crate::registry::function::{FunctionDescriptor, FunctionRegistry};

/// Register the conditional functions
pub fn register_conditional_functions(registry: &mut FunctionRegistry) {
    registry.register_forced(FunctionDescriptor::from_function(IfFunction));
    registry.register_forced(FunctionDescriptor::from_function(IfErrorFunction));
    registry.register_forced(FunctionDescriptor::from_function(InFunction));
    registry.register_forced(FunctionDescriptor::from_function(IndexFunction));
}
