//! Abstract Syntax Tree (AST) definitions for expressions
//!
//! The node set is closed: literals, variable references, unary and binary
//! operations, and calls bound to a registered function.

mod expression;
mod operator;
mod visitor;

pub use expression::*;
pub use operator::*;
pub use visitor::*;
