//! Lexical environments for the Donkey runtime.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::value::Value;

#[derive(Default)]
struct Environment {
    /// Variables defined in this scope
    store: HashMap<String, Value>,
    /// Enclosing scope (None for the root scope)
    outer: Option<Env>,
}

/// Shared handle to one scope in a scope chain.
///
/// Cloning an `Env` shares the scope rather than copying it. Function values
/// and child scopes both hold such handles, which is what keeps a defining
/// scope alive after the call that created it has returned.
///
/// Scopes are single-threaded. A function stored in the very scope it
/// captures forms a reference cycle that is never reclaimed.
#[derive(Clone, Default)]
pub struct Env(Rc<RefCell<Environment>>);

impl Env {
    pub fn new_root() -> Self {
        Self::default()
    }

    /// A fresh, empty scope whose parent is `outer`.
    pub fn new_enclosed(outer: &Env) -> Self {
        Env(Rc::new(RefCell::new(Environment {
            store: HashMap::new(),
            outer: Some(outer.clone()),
        })))
    }

    /// Inserts or overwrites a binding in this scope, never in an ancestor.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        let previous = self.0.borrow_mut().store.insert(name.into(), value);
        // Released only after the borrow ends: it may hold the last handle to other scopes.
        drop(previous);
    }

    /// Looks `name` up from this scope outwards, stopping at the first match.
    pub fn resolve(&self, name: &str) -> Option<Value> {
        let scope = self.0.borrow();
        match scope.store.get(name) {
            Some(v) => Some(v.clone()),
            None => scope.outer.as_ref().and_then(|outer| outer.resolve(name)),
        }
    }

    pub fn outer(&self) -> Option<Env> {
        self.0.borrow().outer.clone()
    }

    pub fn is_root(&self) -> bool {
        self.0.borrow().outer.is_none()
    }

    /// Number of ancestors between this scope and the root.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.outer();
        while let Some(env) = current {
            depth += 1;
            current = env.outer();
        }
        depth
    }

    pub fn ptr_eq(&self, other: &Env) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Bindings of this scope only, sorted by name.
    pub fn vars_snapshot(&self) -> Vec<(String, Value)> {
        let mut vars: Vec<(String, Value)> = self
            .0
            .borrow()
            .store
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        vars.sort_by(|a, b| a.0.cmp(&b.0));
        vars
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.0.borrow().store.keys().cloned().collect();
        names.sort();
        f.debug_struct("Env")
            .field("bindings", &names)
            .field("depth", &self.depth())
            .finish()
    }
}
