//! Function registry and function descriptors
//!
//! Functions receive their arguments unevaluated through [`FunctionArgs`] and
//! decide which ones to evaluate, which is what lets `If` skip its untaken
//! branch and `IfError` trap failures of its first argument.

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use super::error::{RegistryError, RegistryResult};
use crate::ast::Expression;
use crate::context::Context;
use crate::evaluator::{EvaluationError, EvaluationResult, Evaluator};
use crate::model::{Value, VariableProvider};
use crate::parser::error::describe_arity;

/// Accepted argument count range; `None` leaves that side unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Arity {
    /// Minimum number of arguments
    pub min: Option<usize>,
    /// Maximum number of arguments
    pub max: Option<usize>,
}

impl Arity {
    pub const fn exactly(count: usize) -> Self {
        Self {
            min: Some(count),
            max: Some(count),
        }
    }

    pub const fn range(min: usize, max: usize) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub const fn at_least(min: usize) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub const fn at_most(max: usize) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub const fn any() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    /// Whether `count` arguments satisfy both bounds
    pub fn accepts(&self, count: usize) -> bool {
        self.min.is_none_or(|min| count >= min) && self.max.is_none_or(|max| count <= max)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&describe_arity(&self.min, &self.max))
    }
}

/// Unevaluated arguments of a call, with the evaluation state needed to read them
pub struct FunctionArgs<'a> {
    name: &'a str,
    args: &'a [Expression],
    evaluator: &'a Evaluator<'a>,
}

impl<'a> FunctionArgs<'a> {
    pub fn new(name: &'a str, args: &'a [Expression], evaluator: &'a Evaluator<'a>) -> Self {
        Self {
            name,
            args,
            evaluator,
        }
    }

    /// Name the function was called by
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// The unevaluated argument at `index`
    pub fn expression(&self, index: usize) -> Option<&'a Expression> {
        self.args.get(index)
    }

    /// Evaluate the argument at `index`
    ///
    /// Reading past the supplied arguments raises [`EvaluationError::MissingOperand`].
    pub fn evaluate(&self, index: usize) -> EvaluationResult<Value> {
        let expr = self
            .args
            .get(index)
            .ok_or_else(|| EvaluationError::MissingOperand {
                function: self.name.to_string(),
                index,
            })?;
        self.evaluator.evaluate(expr)
    }

    /// Evaluate the argument at `index` if it was supplied
    pub fn evaluate_optional(&self, index: usize) -> EvaluationResult<Option<Value>> {
        if index < self.args.len() {
            self.evaluate(index).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Evaluate every argument in order
    pub fn evaluate_all(&self) -> EvaluationResult<Vec<Value>> {
        self.args
            .iter()
            .map(|expr| self.evaluator.evaluate(expr))
            .collect()
    }

    pub fn variables(&self) -> &dyn VariableProvider {
        self.evaluator.variables()
    }

    pub fn context(&self) -> &Context {
        self.evaluator.context()
    }

    /// Build a function failure carrying this call's name
    pub fn error(&self, message: impl Into<String>) -> EvaluationError {
        EvaluationError::Function {
            name: self.name.to_string(),
            message: message.into(),
        }
    }
}

/// Trait implemented by built-in and embedder-provided functions
pub trait ExpressionFunction: Send + Sync {
    /// Primary registration name
    fn name(&self) -> &str;

    /// Additional names the function answers to
    fn aliases(&self) -> &[&'static str] {
        &[]
    }

    /// Accepted argument count
    fn arity(&self) -> Arity;

    /// Get documentation for this function
    fn documentation(&self) -> &str {
        ""
    }

    /// Evaluate the function against its (lazy) arguments
    fn evaluate(&self, args: &FunctionArgs<'_>) -> EvaluationResult<Value>;
}

/// Closure signature accepted by [`FunctionRegistry::register_closure`]
pub type FunctionClosure = dyn Fn(&FunctionArgs<'_>) -> EvaluationResult<Value> + Send + Sync;

/// Function implementation variants
#[derive(Clone)]
pub enum FunctionImpl {
    /// Trait object implementation
    Trait(Arc<dyn ExpressionFunction>),
    /// Closure implementation
    Closure(Arc<FunctionClosure>),
}

/// A registered function: names, arity and implementation
#[derive(Clone)]
pub struct FunctionDescriptor {
    name: String,
    aliases: Vec<String>,
    arity: Arity,
    documentation: Cow<'static, str>,
    implementation: FunctionImpl,
}

impl FunctionDescriptor {
    /// Describe a trait-based function
    pub fn from_function<F: ExpressionFunction + 'static>(function: F) -> Self {
        Self {
            name: function.name().to_string(),
            aliases: function.aliases().iter().map(|a| a.to_string()).collect(),
            arity: function.arity(),
            documentation: Cow::Owned(function.documentation().to_string()),
            implementation: FunctionImpl::Trait(Arc::new(function)),
        }
    }

    /// Describe a closure-based function
    pub fn from_closure<F>(
        name: impl Into<String>,
        arity: Arity,
        documentation: impl Into<Cow<'static, str>>,
        func: F,
    ) -> Self
    where
        F: Fn(&FunctionArgs<'_>) -> EvaluationResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            arity,
            documentation: documentation.into(),
            implementation: FunctionImpl::Closure(Arc::new(func)),
        }
    }

    /// Add names the function also answers to
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn documentation(&self) -> &str {
        &self.documentation
    }

    /// Run the implementation
    pub fn invoke(&self, args: &FunctionArgs<'_>) -> EvaluationResult<Value> {
        match &self.implementation {
            FunctionImpl::Trait(function) => function.evaluate(args),
            FunctionImpl::Closure(func) => func(args),
        }
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

impl fmt::Debug for FunctionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDescriptor")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("arity", &self.arity)
            .finish()
    }
}

/// Name-keyed function lookup
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: FxHashMap<String, Arc<FunctionDescriptor>>,
    case_insensitive: bool,
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("name_count", &self.functions.len())
            .field("case_insensitive", &self.case_insensitive)
            .finish()
    }
}

impl FunctionRegistry {
    /// Create a new empty registry with case-sensitive lookup
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty registry that ignores case in names
    pub fn case_insensitive() -> Self {
        Self {
            functions: FxHashMap::default(),
            case_insensitive: true,
        }
    }

    fn key<'n>(&self, name: &'n str) -> Cow<'n, str> {
        if self.case_insensitive {
            Cow::Owned(name.to_lowercase())
        } else {
            Cow::Borrowed(name)
        }
    }

    fn keys_for(&self, descriptor: &FunctionDescriptor) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for name in descriptor.names() {
            let key = self.key(name).into_owned();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Register a descriptor under its name and aliases
    ///
    /// Fails without modifying the registry if any of those names is taken.
    pub fn register(&mut self, descriptor: FunctionDescriptor) -> RegistryResult<()> {
        let keys = self.keys_for(&descriptor);
        if let Some(taken) = keys.iter().find(|key| self.functions.contains_key(*key)) {
            return Err(RegistryError::DuplicateFunction {
                name: taken.clone(),
            });
        }
        self.insert(keys, descriptor);
        Ok(())
    }

    /// Register a descriptor, replacing whatever held its names
    pub fn register_forced(&mut self, descriptor: FunctionDescriptor) {
        let keys = self.keys_for(&descriptor);
        for key in &keys {
            self.unregister(key);
        }
        self.insert(keys, descriptor);
    }

    fn insert(&mut self, keys: Vec<String>, descriptor: FunctionDescriptor) {
        log::trace!("registering function '{}' as {:?}", descriptor.name, keys);
        let descriptor = Arc::new(descriptor);
        for key in keys {
            self.functions.insert(key, Arc::clone(&descriptor));
        }
    }

    /// Register a trait-based function
    pub fn register_function<F: ExpressionFunction + 'static>(
        &mut self,
        function: F,
    ) -> RegistryResult<()> {
        self.register(FunctionDescriptor::from_function(function))
    }

    /// Register a closure-based function
    pub fn register_closure<F>(
        &mut self,
        name: impl Into<String>,
        arity: Arity,
        documentation: impl Into<Cow<'static, str>>,
        func: F,
    ) -> RegistryResult<()>
    where
        F: Fn(&FunctionArgs<'_>) -> EvaluationResult<Value> + Send + Sync + 'static,
    {
        self.register(FunctionDescriptor::from_closure(name, arity, documentation, func))
    }

    /// Remove the function registered under `name`, together with its aliases
    pub fn unregister(&mut self, name: &str) -> bool {
        let Some(descriptor) = self.functions.get(self.key(name).as_ref()).cloned() else {
            return false;
        };
        self.functions
            .retain(|_, existing| !Arc::ptr_eq(existing, &descriptor));
        true
    }

    /// Look up a function by name or alias
    pub fn get(&self, name: &str) -> Option<&Arc<FunctionDescriptor>> {
        self.functions.get(self.key(name).as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Distinct registered functions, sorted by primary name
    pub fn descriptors(&self) -> Vec<Arc<FunctionDescriptor>> {
        let mut unique: Vec<Arc<FunctionDescriptor>> = Vec::new();
        for descriptor in self.functions.values() {
            if !unique.iter().any(|seen| Arc::ptr_eq(seen, descriptor)) {
                unique.push(Arc::clone(descriptor));
            }
        }
        unique.sort_by(|a, b| a.name().cmp(b.name()));
        unique
    }

    /// Number of lookup names, aliases included
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(name: &str, value: i64) -> FunctionDescriptor {
        FunctionDescriptor::from_closure(name.to_string(), Arity::exactly(0), "", move |_| {
            Ok(Value::Integer(value))
        })
    }

    #[test]
    fn test_arity_bounds() {
        assert!(Arity::exactly(2).accepts(2));
        assert!(!Arity::exactly(2).accepts(3));
        assert!(Arity::at_least(2).accepts(10));
        assert!(!Arity::at_least(2).accepts(1));
        assert!(Arity::any().accepts(0));
        assert!(Arity::at_most(3).accepts(0));
        assert!(!Arity::at_most(3).accepts(4));
        assert_eq!(Arity::at_most(2).to_string(), "at most 2");
        assert_eq!(Arity::range(1, 2).to_string(), "1 to 2");
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = FunctionRegistry::new();
        registry.register(constant("Answer", 42)).unwrap();
        assert_eq!(
            registry.register(constant("Answer", 7)).unwrap_err(),
            RegistryError::DuplicateFunction {
                name: "Answer".to_string()
            }
        );
        registry.register_forced(constant("Answer", 7));
        assert_eq!(registry.descriptors().len(), 1);
    }

    #[test]
    fn test_aliases_and_unregister() {
        let mut registry = FunctionRegistry::new();
        registry
            .register(constant("Answer", 42).with_aliases(["answer", "ANSWER"]))
            .unwrap();
        assert!(registry.contains("answer"));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.descriptors().len(), 1);

        assert!(registry.unregister("answer"));
        assert!(!registry.contains("Answer"));
        assert!(registry.is_empty());
        assert!(!registry.unregister("Answer"));
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let mut registry = FunctionRegistry::case_insensitive();
        // aliases that fold to the same key do not collide with each other
        registry
            .register(constant("Answer", 42).with_aliases(["answer"]))
            .unwrap();
        assert!(registry.contains("ANSWER"));
        assert_eq!(registry.len(), 1);
    }
}
