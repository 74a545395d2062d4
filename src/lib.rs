//! Embedded expression engine for data-bound document templates
//!
//! Expressions mix arithmetic, comparisons, logic, strings, CSS-style
//! dimensions (`10px`, `50%`) and colors (`#ff8800`), and call functions such
//! as `Calc`, `Var`, `Rgb`, `If` or `IfError`.
//!
//! ```
//! use docexpr::{Context, Value, Variables, evaluate, parse};
//!
//! let context = Context::shared();
//! let expression = parse("If(count > 1, count * 2, 'none')", context).unwrap();
//!
//! let mut variables = Variables::default();
//! variables.insert("count".to_string(), Value::Integer(3));
//! assert_eq!(evaluate(&expression, &variables, context).unwrap(), Value::Integer(6));
//! ```
//!
//! Parsed expressions are immutable and can be evaluated from several threads
//! at once. [`ExpressionEngine`] adds a cache of parsed expressions on top.

pub mod ast;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod parser;
pub mod registry;

pub use ast::{Expression, referenced_variables};
pub use config::{CacheConfig, ContextOptions, EngineConfig};
pub use context::{Context, ContextBuilder};
pub use engine::ExpressionEngine;
pub use error::{ExpressionError, ExpressionResult};
pub use evaluator::{EvaluationError, EvaluationResult, Evaluator, evaluate};
pub use model::{Color, Unit, UnitKind, Value, VariableProvider, Variables};
pub use parser::{ParseError, ParseErrorKind, ParseResult, parse};
pub use registry::{Arity, ExpressionFunction, FunctionArgs, RegistryError};
