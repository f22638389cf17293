//! Chained lexical environments and driver scopes.
//!
//! `Env` is a cheap-clone handle (`Rc<RefCell<Scope>>`); cloning shares the
//! scope, which is how closures capture their defining environment by
//! reference. A child references, but never owns, its parent; closures and
//! stream callbacks keep the scopes they capture alive for exactly as long
//! as they themselves live.
//!
//! Bindings are create-once per scope: shadowing across scopes is allowed,
//! rebinding within one scope is not. Drivers (named effectful sinks) live
//! in a separate namespace with identical chaining semantics.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::{
    duplicate_binding, unresolved_binding, unresolved_driver, selection_empty, EvalError,
    EvalResult,
};
use crate::selector::Selector;
use crate::value::Value;

/// A named effectful sink supplied by the host (or composed by a flow).
pub type Driver = Rc<dyn Fn(Value)>;

/// Binding metadata, matched by selectors (e.g. `class: "digital"`).
pub type Meta = FxHashMap<String, Value>;

/// A single binding: the value plus its selector-visible metadata.
#[derive(Clone)]
pub struct Binding {
    pub value: Value,
    pub meta: Meta,
}

struct Scope {
    bindings: FxHashMap<String, Binding>,
    drivers: FxHashMap<String, Driver>,
    parent: Option<Env>,
}

/// A handle to one scope in the environment chain.
#[derive(Clone)]
pub struct Env(Rc<RefCell<Scope>>);

impl Env {
    /// Create a root scope with no parent.
    pub fn root() -> Env {
        Env(Rc::new(RefCell::new(Scope {
            bindings: FxHashMap::default(),
            drivers: FxHashMap::default(),
            parent: None,
        })))
    }

    /// Create a child scope referencing `parent`.
    pub fn child(parent: &Env) -> Env {
        Env(Rc::new(RefCell::new(Scope {
            bindings: FxHashMap::default(),
            drivers: FxHashMap::default(),
            parent: Some(parent.clone()),
        })))
    }

    /// Install a new binding. Fails with `DuplicateBinding` if the name
    /// already exists in this exact scope; parent scopes are not consulted.
    pub fn bind(&self, name: impl Into<String>, value: Value) -> Result<(), EvalError> {
        self.bind_with_meta(name, value, Meta::default())
    }

    /// Install a new binding carrying selector metadata.
    pub fn bind_with_meta(
        &self,
        name: impl Into<String>,
        value: Value,
        meta: Meta,
    ) -> Result<(), EvalError> {
        let name = name.into();
        let mut scope = self.0.borrow_mut();
        if scope.bindings.contains_key(&name) {
            return Err(duplicate_binding(name));
        }
        scope.bindings.insert(name, Binding { value, meta });
        Ok(())
    }

    /// Resolve an identifier, walking from this scope out to the root.
    pub fn resolve(&self, name: &str) -> EvalResult {
        let parent = {
            let scope = self.0.borrow();
            if let Some(binding) = scope.bindings.get(name) {
                return Ok(binding.value.clone());
            }
            scope.parent.clone()
        };
        match parent {
            Some(parent) => parent.resolve(name),
            None => Err(unresolved_binding(name)),
        }
    }

    /// Register a driver in this scope's driver namespace.
    pub fn register_driver(
        &self,
        name: impl Into<String>,
        driver: Driver,
    ) -> Result<(), EvalError> {
        let name = name.into();
        let mut scope = self.0.borrow_mut();
        if scope.drivers.contains_key(&name) {
            return Err(duplicate_binding(name));
        }
        scope.drivers.insert(name, driver);
        Ok(())
    }

    /// Resolve a driver name, walking from this scope out to the root.
    pub fn resolve_driver(&self, name: &str) -> Result<Driver, EvalError> {
        let parent = {
            let scope = self.0.borrow();
            if let Some(driver) = scope.drivers.get(name) {
                return Ok(Rc::clone(driver));
            }
            scope.parent.clone()
        };
        match parent {
            Some(parent) => parent.resolve_driver(name),
            None => Err(unresolved_driver(name)),
        }
    }

    /// Collect every binding in the accessible chain matched by `selector`,
    /// innermost scope first. Shadowed names are only considered in their
    /// nearest scope. Zero matches is a `SelectionEmpty` error, never an
    /// empty set.
    pub fn select(&self, selector: &Selector) -> Result<Vec<Value>, EvalError> {
        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut selected = Vec::new();
        let mut current = Some(self.clone());
        while let Some(env) = current {
            let parent = {
                let scope = env.0.borrow();
                for (name, binding) in &scope.bindings {
                    if seen.contains(name) {
                        continue;
                    }
                    if selector.matches(name, binding) {
                        selected.push(binding.value.clone());
                    }
                }
                for name in scope.bindings.keys() {
                    seen.insert(name.clone());
                }
                scope.parent.clone()
            };
            current = parent;
        }
        if selected.is_empty() {
            return Err(selection_empty());
        }
        Ok(selected)
    }
}
