//! Operator registry
//!
//! An operator descriptor knows its tags, how tightly it binds, whether a
//! given occurrence is unary, and how to assemble the AST node once the parser
//! has split the token span around it.

use rustc_hash::FxHashMap;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use super::error::{RegistryError, RegistryResult};
use crate::ast::Expression;
use crate::parser::error::{ParseError, ParseResult};
use crate::parser::tokenizer::{SpannedToken, Token};

/// Binding strength, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Precedence {
    /// `??`
    NullCoalescing = 1,
    /// `&&` `||` `and` `or`
    Logical = 2,
    /// `=` `==` `!=` `<>`
    Equality = 3,
    /// `<` `<=` `>` `>=`
    Relational = 4,
    /// `&` `|` `<<` `>>`
    Bitwise = 5,
    /// `+` `-`
    Additive = 6,
    /// `*` `/` `%`
    Multiplicative = 7,
    /// `^`
    Exponent = 8,
    /// Prefix `+` `-` `!` `not`
    Unary = 9,
}

impl Precedence {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Trait for operator descriptors consulted by the parser
pub trait ExpressionOperator: Send + Sync {
    /// Tags this descriptor answers to, e.g. `["&&", "and"]`
    fn tags(&self) -> &[&'static str];

    /// Get a human-friendly name for the operator
    fn human_friendly_name(&self) -> &str;

    /// Binary binding strength; unary occurrences bind at [`Precedence::Unary`]
    fn precedence(&self) -> Precedence;

    /// Whether this occurrence is a prefix operator, given the token before it
    fn is_unary(&self, _previous: Option<&Token<'_>>) -> bool {
        false
    }

    /// Build the node for this occurrence
    ///
    /// `operands[0]` is `None` for unary occurrences. `token` is the operator
    /// token itself and is used for error positions.
    fn build(
        &self,
        token: &SpannedToken<'_>,
        previous: Option<&Token<'_>>,
        operands: [Option<Expression>; 2],
    ) -> ParseResult<Expression>;
}

/// Unwrap an operand or report it missing at the operator
pub fn require_operand(
    operand: Option<Expression>,
    token: &SpannedToken<'_>,
) -> ParseResult<Expression> {
    operand.ok_or_else(|| ParseError::MissingOperand {
        operator: token.value.text.to_string(),
        position: token.start,
    })
}

/// Tag-keyed operator lookup
#[derive(Clone, Default)]
pub struct OperatorRegistry {
    operators: FxHashMap<String, Arc<dyn ExpressionOperator>>,
    case_insensitive: bool,
}

impl fmt::Debug for OperatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&String> = self.operators.keys().collect();
        tags.sort();
        f.debug_struct("OperatorRegistry")
            .field("tags", &tags)
            .field("case_insensitive", &self.case_insensitive)
            .finish()
    }
}

impl OperatorRegistry {
    /// Create a new operator registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry whose word tags match regardless of case
    pub fn case_insensitive() -> Self {
        Self {
            operators: FxHashMap::default(),
            case_insensitive: true,
        }
    }

    fn key<'t>(&self, tag: &'t str) -> Cow<'t, str> {
        if self.case_insensitive {
            Cow::Owned(tag.to_lowercase())
        } else {
            Cow::Borrowed(tag)
        }
    }

    /// Register an operator under all of its tags
    ///
    /// Fails without modifying the registry if any tag is taken.
    pub fn register(&mut self, operator: Arc<dyn ExpressionOperator>) -> RegistryResult<()> {
        if let Some(taken) = operator
            .tags()
            .iter()
            .find(|tag| self.operators.contains_key(self.key(tag).as_ref()))
        {
            return Err(RegistryError::DuplicateOperator {
                tag: taken.to_string(),
            });
        }
        self.register_forced(operator);
        Ok(())
    }

    /// Register an operator, replacing the holders of its tags
    pub fn register_forced(&mut self, operator: Arc<dyn ExpressionOperator>) {
        log::trace!(
            "registering operator '{}' as {:?}",
            operator.human_friendly_name(),
            operator.tags()
        );
        for tag in operator.tags() {
            let key = self.key(tag).into_owned();
            self.operators.insert(key, Arc::clone(&operator));
        }
    }

    /// Remove a single tag; other tags of the same descriptor stay registered
    pub fn unregister(&mut self, tag: &str) -> bool {
        let key = self.key(tag).into_owned();
        self.operators.remove(&key).is_some()
    }

    /// Look up the descriptor for a tag
    pub fn get(&self, tag: &str) -> Option<&Arc<dyn ExpressionOperator>> {
        self.operators.get(self.key(tag).as_ref())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    /// Registered tags, sorted
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.operators.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::operators::InfixOperator;
    use crate::ast::BinaryOperator;

    fn plus() -> Arc<dyn ExpressionOperator> {
        Arc::new(InfixOperator::new(
            &["+"],
            "Addition",
            Precedence::Additive,
            BinaryOperator::Add,
        ))
    }

    #[test]
    fn test_precedence_order() {
        assert!(Precedence::NullCoalescing < Precedence::Logical);
        assert!(Precedence::Multiplicative > Precedence::Additive);
        assert!(Precedence::Unary > Precedence::Exponent);
        assert_eq!(Precedence::Unary.as_u8(), 9);
    }

    #[test]
    fn test_duplicate_tag_rejected_unless_forced() {
        let mut registry = OperatorRegistry::new();
        registry.register(plus()).unwrap();
        assert_eq!(
            registry.register(plus()).unwrap_err(),
            RegistryError::DuplicateOperator {
                tag: "+".to_string()
            }
        );
        registry.register_forced(plus());
        assert_eq!(registry.len(), 1);
        assert!(registry.unregister("+"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_case_insensitive_tags() {
        let mut registry = OperatorRegistry::case_insensitive();
        registry
            .register(Arc::new(InfixOperator::new(
                &["&&", "and"],
                "And",
                Precedence::Logical,
                BinaryOperator::And,
            )))
            .unwrap();
        assert!(registry.contains("AND"));
        assert!(registry.contains("&&"));
        assert_eq!(registry.tags(), vec!["&&", "and"]);
    }
}
