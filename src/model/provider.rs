//! Variable binding providers
//!
//! Evaluation reads bindings through [`VariableProvider`], so callers can hand
//! over a plain map or a provider that resolves names on demand.

use rustc_hash::FxHashMap;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use super::value::Value;

/// Reserved binding that carries the position inside a repeating template block
pub const INDEX_VARIABLE: &str = "$index";

/// Default binding map
pub type Variables = FxHashMap<String, Value>;

/// Source of variable values for a single evaluation
pub trait VariableProvider {
    /// Look up a binding; `None` when the name is unbound
    fn get_variable(&self, name: &str) -> Option<Cow<'_, Value>>;
}

impl<S: BuildHasher> VariableProvider for HashMap<String, Value, S> {
    fn get_variable(&self, name: &str) -> Option<Cow<'_, Value>> {
        self.get(name).map(Cow::Borrowed)
    }
}

impl VariableProvider for BTreeMap<String, Value> {
    fn get_variable(&self, name: &str) -> Option<Cow<'_, Value>> {
        self.get(name).map(Cow::Borrowed)
    }
}

/// No bindings at all
impl VariableProvider for () {
    fn get_variable(&self, _name: &str) -> Option<Cow<'_, Value>> {
        None
    }
}

impl<T: VariableProvider + ?Sized> VariableProvider for &T {
    fn get_variable(&self, name: &str) -> Option<Cow<'_, Value>> {
        (**self).get_variable(name)
    }
}

/// Provider backed by a lookup closure
pub struct FnVariableProvider<F>(pub F);

impl<F> VariableProvider for FnVariableProvider<F>
where
    F: Fn(&str) -> Option<Value>,
{
    fn get_variable(&self, name: &str) -> Option<Cow<'_, Value>> {
        (self.0)(name).map(Cow::Owned)
    }
}

/// Layers bindings over a parent provider; the first match wins
pub struct ScopedVariables<'a> {
    locals: Variables,
    parent: &'a dyn VariableProvider,
}

impl<'a> ScopedVariables<'a> {
    pub fn new(parent: &'a dyn VariableProvider) -> Self {
        Self {
            locals: Variables::default(),
            parent,
        }
    }

    /// Bind `name` in this scope, shadowing the parent
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.locals.insert(name.into(), value.into());
        self
    }
}

impl VariableProvider for ScopedVariables<'_> {
    fn get_variable(&self, name: &str) -> Option<Cow<'_, Value>> {
        self.locals
            .get(name)
            .map(Cow::Borrowed)
            .or_else(|| self.parent.get_variable(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_providers() {
        let mut vars = Variables::default();
        vars.insert("title".to_string(), Value::string("Report"));
        assert_eq!(
            vars.get_variable("title").as_deref(),
            Some(&Value::string("Report"))
        );
        assert!(vars.get_variable("missing").is_none());

        let tree: BTreeMap<String, Value> = [("n".to_string(), Value::Integer(1))].into();
        assert_eq!(tree.get_variable("n").as_deref(), Some(&Value::Integer(1)));
        assert!(().get_variable("n").is_none());
    }

    #[test]
    fn test_scoped_shadowing() {
        let mut vars = Variables::default();
        vars.insert("a".to_string(), Value::Integer(1));
        vars.insert("b".to_string(), Value::Integer(2));

        let scoped = ScopedVariables::new(&vars).with("a", 10);
        assert_eq!(scoped.get_variable("a").as_deref(), Some(&Value::Integer(10)));
        assert_eq!(scoped.get_variable("b").as_deref(), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_fn_provider() {
        let provider = FnVariableProvider(|name: &str| (name == "x").then(|| Value::Integer(7)));
        assert_eq!(provider.get_variable("x").as_deref(), Some(&Value::Integer(7)));
        assert!(provider.get_variable("y").is_none());
    }
}
