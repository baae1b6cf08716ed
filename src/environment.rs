//! Lexical scope chain.
//!
//! Each [`Environment`] maps names to values and optionally points at the
//! scope that encloses it; the global scope ends the chain.  Scopes are shared
//! through `Rc<RefCell<_>>` because a closure keeps the scope it was created in
//! alive after the block that created it has finished.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;

use crate::error::{LoxError, Result};
use crate::token::Token;
use crate::value::Value;

/// Shared, mutable handle to a scope.
pub type EnvRef = Rc<RefCell<Environment>>;

#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    /// A root (global) scope.
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    /// A scope nested inside `enclosing`.
    pub fn with_enclosing(enclosing: EnvRef) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Wrap `self` into a shareable handle.
    pub fn into_ref(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    /// Bind `name` in this scope, replacing any previous binding here.
    pub fn define(&mut self, name: &str, value: Value) {
        debug!("define '{}' = {}", name, value);

        self.values.insert(name.to_string(), value);
    }

    /// Look `name` up, walking outwards through the chain.
    pub fn get(&self, name: &Token) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(undefined_variable(name))
        }
    }

    /// Overwrite an existing binding, walking outwards through the chain.
    /// Assignment never creates a variable.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<()> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(undefined_variable(name))
        }
    }

    /// Read `name` from the scope exactly `distance` hops out from `env`.
    ///
    /// The resolver guarantees the binding exists there; a miss is an
    /// interpreter bug, not a user error.
    pub fn get_at(env: &EnvRef, distance: usize, name: &str) -> Value {
        Self::ancestor(env, distance)
            .borrow()
            .values
            .get(name)
            .cloned()
            .expect("resolved variable missing from its scope")
    }

    /// Write `name` in the scope exactly `distance` hops out from `env`.
    pub fn assign_at(env: &EnvRef, distance: usize, name: &Token, value: Value) {
        Self::ancestor(env, distance)
            .borrow_mut()
            .values
            .insert(name.lexeme.clone(), value);
    }

    fn ancestor(env: &EnvRef, distance: usize) -> EnvRef {
        let mut environment: EnvRef = Rc::clone(env);

        for _ in 0..distance {
            let parent: EnvRef = environment
                .borrow()
                .enclosing
                .clone()
                .expect("resolver depth exceeds the scope chain");
            environment = parent;
        }

        environment
    }
}

fn undefined_variable(name: &Token) -> LoxError {
    LoxError::runtime(
        name.line,
        format!("Undefined variable '{}'.", name.lexeme),
    )
}
