//! Expression engine - parse once, evaluate many times
//!
//! [`ExpressionEngine`] pairs a [`Context`] with an LRU cache of parsed
//! expressions keyed by source text. Cached trees are shared as
//! `Arc<Expression>`, so a hit hands out the same tree every time.

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::ast::Expression;
use crate::config::{CacheConfig, EngineConfig};
use crate::context::{Context, ContextBuilder};
use crate::error::ExpressionResult;
use crate::evaluator;
use crate::model::{Value, VariableProvider};
use crate::parser::{self, ParseResult};

/// Parses and evaluates expressions against one context
pub struct ExpressionEngine {
    context: Arc<Context>,
    /// `None` when caching is disabled
    cache: Option<Mutex<LruCache<String, Arc<Expression>>>>,
}

impl Default for ExpressionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionEngine {
    /// Engine with the built-in registries and default configuration
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let context = ContextBuilder::with_options(config.context).build();
        Self::with_context(Arc::new(context), config.cache)
    }

    /// Engine over a custom context, e.g. one with extra functions
    pub fn with_context(context: Arc<Context>, cache: CacheConfig) -> Self {
        let cache = NonZeroUsize::new(cache.capacity)
            .filter(|_| cache.enabled)
            .map(|capacity| Mutex::new(LruCache::new(capacity)));
        if cache.is_none() {
            log::debug!("Expression cache disabled");
        }
        Self { context, cache }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Parse `text`, reusing a cached tree when there is one
    pub fn compile(&self, text: &str) -> ParseResult<Arc<Expression>> {
        let Some(cache) = &self.cache else {
            return Ok(Arc::new(parser::parse(text, &self.context)?));
        };

        if let Some(expression) = cache.lock().get(text) {
            log::debug!("Expression cache hit for '{text}'");
            return Ok(Arc::clone(expression));
        }

        // Parse outside the lock; a concurrent miss on the same text parses twice
        let expression = Arc::new(parser::parse(text, &self.context)?);
        let mut cache = cache.lock();
        if let Some(existing) = cache.get(text) {
            return Ok(Arc::clone(existing));
        }
        log::debug!("Caching parsed expression '{text}'");
        cache.put(text.to_string(), Arc::clone(&expression));
        Ok(expression)
    }

    /// Parse (or fetch from cache) and evaluate `text`
    pub fn evaluate(
        &self,
        text: &str,
        variables: &dyn VariableProvider,
    ) -> ExpressionResult<Value> {
        let expression = self.compile(text)?;
        Ok(self.evaluate_expression(&expression, variables)?)
    }

    /// Evaluate an already compiled expression
    pub fn evaluate_expression(
        &self,
        expression: &Expression,
        variables: &dyn VariableProvider,
    ) -> evaluator::EvaluationResult<Value> {
        evaluator::evaluate(expression, variables, &self.context)
    }

    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.lock().clear();
            log::debug!("Expression cache cleared");
        }
    }

    /// Number of cached expressions
    pub fn cache_len(&self) -> usize {
        self.cache.as_ref().map_or(0, |cache| cache.lock().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Variables;

    #[test]
    fn test_cache_hit_returns_same_tree() {
        let engine = ExpressionEngine::new();
        let first = engine.compile("1 + x").unwrap();
        let second = engine.compile("1 + x").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(engine.cache_len(), 1);

        engine.clear_cache();
        assert_eq!(engine.cache_len(), 0);
        let third = engine.compile("1 + x").unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
    }

    #[test]
    fn test_lru_eviction() {
        let engine = ExpressionEngine::with_config(EngineConfig {
            cache: CacheConfig::new(true, 2),
            ..EngineConfig::default()
        });
        let a = engine.compile("1").unwrap();
        engine.compile("2").unwrap();
        engine.compile("1").unwrap();
        engine.compile("3").unwrap();
        assert_eq!(engine.cache_len(), 2);
        assert!(Arc::ptr_eq(&a, &engine.compile("1").unwrap()));
    }

    #[test]
    fn test_disabled_cache_parses_every_time() {
        let engine = ExpressionEngine::with_config(EngineConfig {
            cache: CacheConfig::disabled(),
            ..EngineConfig::default()
        });
        let first = engine.compile("2 * 3").unwrap();
        let second = engine.compile("2 * 3").unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(engine.cache_len(), 0);
    }

    #[test]
    fn test_parse_errors_are_not_cached() {
        let engine = ExpressionEngine::new();
        assert!(engine.compile("1 +").is_err());
        assert_eq!(engine.cache_len(), 0);
    }

    #[test]
    fn test_evaluate() {
        let engine = ExpressionEngine::new();
        let mut vars = Variables::default();
        vars.insert("x".to_string(), Value::Integer(4));
        assert_eq!(engine.evaluate("x * 2 + 1", &vars).unwrap(), Value::Integer(9));
        assert!(engine.evaluate("x / 0", &vars).is_err());
    }
}
