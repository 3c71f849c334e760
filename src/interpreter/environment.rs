use crate::value::Value;
use indexmap::IndexMap;

use super::error::InterpreterError;

/// The single flat namespace of a run.
///
/// There is no block scoping: declarations inside `carve` and `spin` bodies
/// land in the same map as top-level ones. Bindings keep declaration order so
/// dumps of the final state are stable.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: IndexMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Binds `name`, overwriting any existing binding. Returns the previous value.
    pub fn declare(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.bindings.insert(name.into(), value)
    }

    /// Overwrites an existing binding; fails if `name` was never declared.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), InterpreterError> {
        match self.bindings.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(InterpreterError::undeclared_variable(name)),
        }
    }

    /// Unbinds `name`; fails if it is not bound.
    pub fn remove(&mut self, name: &str) -> Result<Value, InterpreterError> {
        self.bindings
            .shift_remove(name)
            .ok_or_else(|| InterpreterError::undeclared_variable(name))
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(name, value)| (name.as_str(), value))
    }
}
