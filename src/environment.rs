//! Lexically nested name -> value mapping.
//!
//! Wrapped in `Rc<RefCell<_>>` so a closure can share ownership of the
//! environment active at its creation and keep it alive past the block that
//! created it, independent of anything else still referencing that block.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::token::Token;
use crate::value::Value;

#[derive(Debug)]
struct EnvironmentData {
    values: HashMap<String, Value>,
    enclosing: Option<Environment>,
}

#[derive(Debug, Clone)]
pub struct Environment(Rc<RefCell<EnvironmentData>>);

impl Environment {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(EnvironmentData {
            values: HashMap::new(),
            enclosing: None,
        })))
    }

    pub fn with_enclosing(enclosing: Environment) -> Self {
        Self(Rc::new(RefCell::new(EnvironmentData {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        })))
    }

    /// Inserts in the current environment; shadowing outer scopes and
    /// redefinition at the same level are both allowed.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().values.insert(name.into(), value);
    }

    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        let data = self.0.borrow();
        if let Some(value) = data.values.get(&name.lexeme) {
            return Ok(value.clone());
        }
        if let Some(enclosing) = &data.enclosing {
            return enclosing.get(name);
        }
        Err(RuntimeError {
            message: format!("Undefined variable '{}'.", name.lexeme),
            token: name.clone(),
        })
    }

    pub fn assign(&self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        let mut data = self.0.borrow_mut();
        if data.values.contains_key(&name.lexeme) {
            data.values.insert(name.lexeme.clone(), value);
            return Ok(());
        }
        match &data.enclosing {
            Some(enclosing) => enclosing.assign(name, value),
            None => Err(RuntimeError {
                message: format!("Undefined variable '{}'.", name.lexeme),
                token: name.clone(),
            }),
        }
    }

    fn ancestor(&self, depth: usize) -> Environment {
        let mut env = self.clone();
        for _ in 0..depth {
            let next = env
                .0
                .borrow()
                .enclosing
                .clone()
                .expect("resolver recorded a depth with no matching enclosing environment");
            env = next;
        }
        env
    }

    /// O(depth) lookup using the depth the resolver already computed,
    /// bypassing accidental shadowing introduced in intermediate scopes.
    pub fn get_at(&self, depth: usize, name: &str) -> Value {
        self.ancestor(depth)
            .0
            .borrow()
            .values
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("resolver recorded depth {depth} for undefined '{name}'"))
    }

    pub fn assign_at(&self, depth: usize, name: &Token, value: Value) {
        self.ancestor(depth)
            .0
            .borrow_mut()
            .values
            .insert(name.lexeme.clone(), value);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Literal, TokenKind};

    fn token(name: &str) -> Token {
        Token::new(TokenKind::Identifier, name, Literal::None, 1)
    }

    #[test]
    fn shadowing_and_lookup() {
        let global = Environment::new();
        global.define("x", Value::Number(1.0));

        let block = Environment::with_enclosing(global.clone());
        block.define("x", Value::Number(2.0));

        assert_eq!(block.get(&token("x")).unwrap(), Value::Number(2.0));
        assert_eq!(global.get(&token("x")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn assign_walks_to_defining_scope() {
        let global = Environment::new();
        global.define("x", Value::Number(1.0));

        let block = Environment::with_enclosing(global.clone());
        block.assign(&token("x"), Value::Number(9.0)).unwrap();

        assert_eq!(global.get(&token("x")).unwrap(), Value::Number(9.0));
    }

    #[test]
    fn get_at_bypasses_intermediate_shadow() {
        let global = Environment::new();
        global.define("x", Value::Number(1.0));

        let middle = Environment::with_enclosing(global.clone());
        middle.define("x", Value::Number(2.0));

        let inner = Environment::with_enclosing(middle);

        assert_eq!(inner.get_at(1, "x"), Value::Number(2.0));
        assert_eq!(inner.get_at(2, "x"), Value::Number(1.0));
    }

    #[test]
    fn undefined_variable_is_runtime_error() {
        let env = Environment::new();
        assert!(env.get(&token("missing")).is_err());
    }
}
