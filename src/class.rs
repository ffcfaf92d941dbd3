//! Class and instance values.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::EvalResult;
use crate::function::{Callable, LoxFunction};
use crate::interpreter::Interpreter;
use crate::token::Token;
use crate::value::Value;

#[derive(Debug)]
pub struct LoxClass {
    pub name: String,
    pub superclass: Option<Rc<LoxClass>>,
    methods: HashMap<String, Rc<LoxFunction>>,
}

impl LoxClass {
    pub fn new(
        name: impl Into<String>,
        superclass: Option<Rc<LoxClass>>,
        methods: HashMap<String, Rc<LoxFunction>>,
    ) -> Self {
        Self {
            name: name.into(),
            superclass,
            methods,
        }
    }

    /// Looks up the inheritance chain; a subclass method of the same name
    /// shadows the parent's, matching `super` dispatch in the evaluator.
    pub fn find_method(&self, name: &str) -> Option<Rc<LoxFunction>> {
        if let Some(method) = self.methods.get(name) {
            return Some(method.clone());
        }
        self.superclass
            .as_ref()
            .and_then(|super_class| super_class.find_method(name))
    }

    /// Calling a class constructs an instance; arity mirrors `init`'s, or
    /// zero when the class declares none.
    pub fn arity(&self) -> usize {
        self.find_method("init").map_or(0, |init| init.arity())
    }

    /// Takes `Rc<Self>` rather than `&self` so the fresh instance can hold a
    /// strong handle back to its class without the class needing a
    /// self-referential `Rc` of its own.
    pub fn instantiate(
        self: &Rc<Self>,
        interpreter: &mut Interpreter,
        args: Vec<Value>,
    ) -> EvalResult<Value> {
        let instance = Rc::new(RefCell::new(LoxInstance::new(self.clone())));
        if let Some(init) = self.find_method("init") {
            init.bind(Value::Instance(instance.clone()))
                .call(interpreter, args)?;
        }
        Ok(Value::Instance(instance))
    }
}

#[derive(Debug)]
pub struct LoxInstance {
    pub class: Rc<LoxClass>,
    fields: RefCell<HashMap<String, Value>>,
}

impl LoxInstance {
    pub fn new(class: Rc<LoxClass>) -> Self {
        Self {
            class,
            fields: RefCell::new(HashMap::new()),
        }
    }

    pub fn get(this: &Rc<RefCell<LoxInstance>>, name: &Token) -> Result<Value, crate::error::RuntimeError> {
        let instance = this.borrow();
        if let Some(value) = instance.fields.borrow().get(&name.lexeme) {
            return Ok(value.clone());
        }
        if let Some(method) = instance.class.find_method(&name.lexeme) {
            let bound = method.bind(Value::Instance(this.clone()));
            return Ok(Value::Function(Rc::new(bound)));
        }
        Err(crate::error::RuntimeError {
            message: format!("Undefined property '{}'.", name.lexeme),
            token: name.clone(),
        })
    }

    pub fn set(&self, name: &Token, value: Value) {
        self.fields.borrow_mut().insert(name.lexeme.clone(), value);
    }
}

impl fmt::Display for LoxClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
