//! Callable values: user-defined functions/methods and the small set of
//! natives the interpreter exposes directly, grounded on the teacher's
//! `run_fn_call` dispatch in its legacy interpreter, generalized from a
//! `match`-on-name dispatch to a trait object.

use std::fmt;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::ast::FunctionDecl;
use crate::environment::Environment;
use crate::error::EvalResult;
use crate::interpreter::Interpreter;
use crate::value::Value;

pub trait Callable {
    fn arity(&self) -> usize;
    fn call(&self, interpreter: &mut Interpreter, args: Vec<Value>) -> EvalResult<Value>;
    fn name(&self) -> &str;
}

/// A user-defined function or method, closing over the environment active at
/// its declaration. `is_initializer` makes a class's `init()` always return
/// `this` regardless of its own `return` statements.
#[derive(Debug)]
pub struct LoxFunction {
    declaration: Rc<FunctionDecl>,
    closure: Environment,
    is_initializer: bool,
}

impl LoxFunction {
    pub fn new(declaration: Rc<FunctionDecl>, closure: Environment, is_initializer: bool) -> Self {
        Self {
            declaration,
            closure,
            is_initializer,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    /// Produces a fresh function bound to `instance` via a one-variable
    /// environment wrapping the original closure, the same scheme the
    /// corpus's jlox-derived resolver expects `this` to be resolved through.
    pub fn bind(&self, instance: Value) -> LoxFunction {
        let env = Environment::with_enclosing(self.closure.clone());
        env.define("this", instance);
        LoxFunction {
            declaration: self.declaration.clone(),
            closure: env,
            is_initializer: self.is_initializer,
        }
    }
}

impl Callable for LoxFunction {
    fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    fn call(&self, interpreter: &mut Interpreter, args: Vec<Value>) -> EvalResult<Value> {
        let env = Environment::with_enclosing(self.closure.clone());
        for (param, arg) in self.declaration.params.iter().zip(args) {
            env.define(param.lexeme.clone(), arg);
        }

        let result = interpreter.execute_block(&self.declaration.body, env);

        match result {
            Ok(()) => {
                if self.is_initializer {
                    Ok(self.closure.get_at(0, "this"))
                } else {
                    Ok(Value::Nil)
                }
            }
            Err(crate::error::ControlFlow::Return(value)) => {
                if self.is_initializer {
                    Ok(self.closure.get_at(0, "this"))
                } else {
                    Ok(value)
                }
            }
            Err(err) => Err(err),
        }
    }

    fn name(&self) -> &str {
        self.name()
    }
}

type NativeFn = fn(&mut Interpreter, &[Value]) -> EvalResult<Value>;

/// Host-provided builtin, analogous to the teacher's small set of
/// compiler-intrinsic functions, exposed through the same `Callable`
/// contract user-defined functions use.
pub struct NativeFunction {
    pub name: String,
    arity: usize,
    func: NativeFn,
}

impl NativeFunction {
    pub fn new(name: impl Into<String>, arity: usize, func: NativeFn) -> Self {
        Self {
            name: name.into(),
            arity,
            func,
        }
    }

    pub fn clock() -> Self {
        Self::new("clock", 0, |_interp, _args| {
            let secs = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("system clock is before the Unix epoch")
                .as_secs_f64();
            Ok(Value::Number(secs))
        })
    }
}

impl Callable for NativeFunction {
    fn arity(&self) -> usize {
        self.arity
    }

    fn call(&self, interpreter: &mut Interpreter, args: Vec<Value>) -> EvalResult<Value> {
        (self.func)(interpreter, &args)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}
