// ABOUTME: Environment module for managing variable bindings and scopes

use crate::error::SchemeError;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A lexical frame: bindings plus an optional parent. Closures capture the
/// frame chain by reference, so mutation through one handle is visible to
/// every holder.
pub struct Environment {
    bindings: RefCell<HashMap<Rc<str>, Value>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a new root environment with no parent
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// Creates a new child environment with a parent
    pub fn with_parent(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent),
        })
    }

    /// Binds a name in THIS frame unconditionally (built-ins, parameters,
    /// defmacro)
    pub fn insert(&self, name: Rc<str>, value: Value) {
        self.bindings.borrow_mut().insert(name, value);
    }

    /// Binds a name in THIS frame; fails if the name is already bound here
    pub fn define(&self, name: Rc<str>, value: Value) -> Result<(), SchemeError> {
        let mut bindings = self.bindings.borrow_mut();
        if bindings.contains_key(&*name) {
            return Err(SchemeError::RedefinedVariable(name.to_string()));
        }
        bindings.insert(name, value);
        Ok(())
    }

    /// Looks up a name in this frame and parent frames recursively
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }

        if let Some(ref parent) = self.parent {
            return parent.get(name);
        }

        None
    }

    /// Reassigns the innermost existing binding (set!)
    pub fn set(&self, name: &str, value: Value) -> Result<(), SchemeError> {
        {
            let mut bindings = self.bindings.borrow_mut();
            if let Some(slot) = bindings.get_mut(name) {
                *slot = value;
                return Ok(());
            }
        }

        if let Some(ref parent) = self.parent {
            return parent.set(name, value);
        }

        Err(SchemeError::UndefinedVariable(name.to_string()))
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // bound values can reference this frame again through closures, so
        // only the names are printed
        let mut names: Vec<String> = self
            .bindings
            .borrow()
            .keys()
            .map(|k| k.to_string())
            .collect();
        names.sort();
        f.debug_struct("Environment")
            .field("bindings", &names)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
