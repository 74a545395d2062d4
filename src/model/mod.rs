//! Data model and value types for expressions
//!
//! This module provides the dynamically typed [`Value`], the composite color and
//! dimensional types it can carry, coercion helpers, and variable providers.

pub mod color;
pub mod provider;
pub mod type_coercion;
pub mod unit;
pub mod value;

pub use color::Color;
pub use provider::{
    FnVariableProvider, INDEX_VARIABLE, ScopedVariables, VariableProvider, Variables,
};
pub use type_coercion::{
    CoercionError, CoercionResult, Number, NumericKind, StringComparison, TypeCoercion,
};
pub use unit::{Unit, UnitKind};
pub use value::Value;
