//! CSS-style functions: `calc()`, `var()` and `rgb()`

mod calc;
mod rgb;
mod var;

pub use calc::CalcFunction;
pub use rgb::RgbFunction;
pub use var::VarFunction;

use crate::registry::function::{FunctionDescriptor, FunctionRegistry};

/// Register the CSS-style functions
pub fn register_css_functions(registry: &mut FunctionRegistry) {
    registry.register_forced(FunctionDescriptor::from_function(CalcFunction));
    registry.register_forced(FunctionDescriptor::from_function(VarFunction));
    registry.register_forced(FunctionDescriptor::from_function(RgbFunction));
}
