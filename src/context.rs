//! Parsing and evaluation context
//!
//! A [`Context`] bundles the operator and function registries with the
//! case-sensitivity options. It is assembled with a [`ContextBuilder`] and is
//! read-only afterwards, so one context can serve any number of threads.

use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::sync::Arc;

use crate::config::ContextOptions;
use crate::evaluator::EvaluationResult;
use crate::model::{StringComparison, Value};
use crate::registry::{
    Arity, ExpressionFunction, ExpressionOperator, FunctionArgs, FunctionDescriptor,
    FunctionRegistry, OperatorRegistry, RegistryResult, create_registries,
};

static SHARED: Lazy<Context> = Lazy::new(Context::default);

/// Frozen registries and options
pub struct Context {
    operators: OperatorRegistry,
    functions: FunctionRegistry,
    options: ContextOptions,
}

impl Context {
    /// Context with the built-in registries and the given options
    pub fn new(options: ContextOptions) -> Self {
        ContextBuilder::with_options(options).build()
    }

    /// Process-wide context with default options and built-ins only
    pub fn shared() -> &'static Context {
        &SHARED
    }

    pub fn operators(&self) -> &OperatorRegistry {
        &self.operators
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn options(&self) -> &ContextOptions {
        &self.options
    }

    /// How strings are compared during evaluation
    pub fn string_comparison(&self) -> StringComparison {
        self.options.string_comparison()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(ContextOptions::default())
    }
}

/// Assembles a [`Context`], starting from the built-in registries
///
/// Name matching is fixed by the options the builder is created with, so the
/// registries are built up front and custom entries land in the same maps.
pub struct ContextBuilder {
    operators: OperatorRegistry,
    functions: FunctionRegistry,
    options: ContextOptions,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::with_options(ContextOptions::default())
    }

    pub fn with_options(options: ContextOptions) -> Self {
        let (functions, operators) = create_registries(options.ignore_case_for_parsing);
        Self {
            operators,
            functions,
            options,
        }
    }

    /// Add a function; fails if its name or an alias is already registered
    pub fn register_function<F: ExpressionFunction + 'static>(
        mut self,
        function: F,
    ) -> RegistryResult<Self> {
        self.functions.register_function(function)?;
        Ok(self)
    }

    /// Add a function built from a closure
    pub fn register_closure<F>(
        mut self,
        name: impl Into<String>,
        arity: Arity,
        documentation: impl Into<Cow<'static, str>>,
        func: F,
    ) -> RegistryResult<Self>
    where
        F: Fn(&FunctionArgs<'_>) -> EvaluationResult<Value> + Send + Sync + 'static,
    {
        self.functions
            .register_closure(name, arity, documentation, func)?;
        Ok(self)
    }

    /// Add a function, replacing any function that holds one of its names
    pub fn register_function_forced(mut self, descriptor: FunctionDescriptor) -> Self {
        self.functions.register_forced(descriptor);
        self
    }

    /// Add an operator; fails if one of its tags is already registered
    pub fn register_operator(
        mut self,
        operator: Arc<dyn ExpressionOperator>,
    ) -> RegistryResult<Self> {
        self.operators.register(operator)?;
        Ok(self)
    }

    /// Add an operator, replacing whatever held its tags
    pub fn register_operator_forced(mut self, operator: Arc<dyn ExpressionOperator>) -> Self {
        self.operators.register_forced(operator);
        self
    }

    /// Remove a function along with its aliases; unknown names are ignored
    pub fn unregister_function(mut self, name: &str) -> Self {
        if !self.functions.unregister(name) {
            log::debug!("unregister_function: '{name}' is not registered");
        }
        self
    }

    /// Remove the operator registered under `tag`; unknown tags are ignored
    pub fn unregister_operator(mut self, tag: &str) -> Self {
        if !self.operators.unregister(tag) {
            log::debug!("unregister_operator: '{tag}' is not registered");
        }
        self
    }

    pub fn build(self) -> Context {
        log::debug!(
            "Built context with {} operator tags and {} function names",
            self.operators.len(),
            self.functions.len()
        );
        Context {
            operators: self.operators,
            functions: self.functions,
            options: self.options,
        }
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryError;

    #[test]
    fn test_context_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Context>();
    }

    #[test]
    fn test_builder_registration() {
        let context = ContextBuilder::new()
            .register_closure("Twice", Arity::exactly(1), "", |args| {
                let value = args.evaluate(0)?;
                crate::registry::operators::arithmetic::add(&value, &value)
            })
            .unwrap()
            .unregister_function("Rgb")
            .unregister_operator("<<")
            .build();

        assert!(context.functions().contains("Twice"));
        assert!(!context.functions().contains("Rgb"));
        assert!(!context.functions().contains("rgb"));
        assert!(!context.operators().contains("<<"));
        assert!(context.operators().contains(">>"));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let result = ContextBuilder::new().register_closure("If", Arity::any(), "", |_| {
            Ok(Value::Null)
        });
        assert!(matches!(
            result,
            Err(RegistryError::DuplicateFunction { name }) if name == "If"
        ));
    }

    #[test]
    fn test_options_drive_string_comparison() {
        let context = Context::new(ContextOptions {
            ignore_case_for_equality: true,
            ..ContextOptions::default()
        });
        assert_eq!(context.string_comparison(), StringComparison::IgnoreCase);
        assert_eq!(
            Context::shared().string_comparison(),
            StringComparison::Ordinal
        );
    }
}
