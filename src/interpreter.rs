//! Tree-walking evaluator. Statement execution and expression evaluation are
//! both plain recursive `match`es over the AST, the same shape as the
//! teacher's `run_statement`/`run_expression`, generalized from a
//! `Vec<HashMap<_>>` scope stack to the `Environment` chain plus the
//! resolver's precomputed depths.

use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::{Expr, LiteralValue, NodeId, Stmt};
use crate::class::{LoxClass, LoxInstance};
use crate::environment::Environment;
use crate::error::{ControlFlow, EvalResult, Reporter, RuntimeError};
use crate::function::{Callable, LoxFunction, NativeFunction};
use crate::token::TokenKind;
use crate::value::Value;

pub struct Interpreter {
    pub globals: Environment,
    environment: Environment,
    locals: HashMap<NodeId, usize>,
}

impl Interpreter {
    pub fn new() -> Self {
        let globals = Environment::new();
        globals.define(
            "clock",
            Value::NativeFunction(Rc::new(NativeFunction::clock())),
        );
        Self {
            environment: globals.clone(),
            globals,
            locals: HashMap::new(),
        }
    }

    /// Called by the resolver once per variable reference; looked back up
    /// by `look_up_variable`/`Assign` at evaluation time.
    pub fn resolve(&mut self, node_id: NodeId, depth: usize) {
        self.locals.insert(node_id, depth);
    }

    pub fn interpret(&mut self, statements: &[Stmt], reporter: &mut Reporter) {
        for stmt in statements {
            if let Err(flow) = self.execute(stmt) {
                match flow {
                    ControlFlow::Error(crate::error::LoxError::Runtime(err)) => {
                        reporter.runtime_error(&err);
                        return;
                    }
                    ControlFlow::Error(_) => return,
                    ControlFlow::Return(_) => {
                        unreachable!("resolver rejects `return` at top level")
                    }
                }
            }
        }
    }

    fn execute(&mut self, stmt: &Stmt) -> EvalResult<()> {
        match stmt {
            Stmt::Expression { expr } => {
                self.evaluate(expr)?;
                Ok(())
            }
            Stmt::Print { expr } => {
                let value = self.evaluate(expr)?;
                println!("{}", value.stringify());
                Ok(())
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.environment.define(name.lexeme.clone(), value);
                Ok(())
            }
            Stmt::Block { statements } => {
                let block_env = Environment::with_enclosing(self.environment.clone());
                self.execute_block(statements, block_env)
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    self.execute(body)?;
                }
                Ok(())
            }
            Stmt::Function { decl } => {
                let function = LoxFunction::new(decl.clone(), self.environment.clone(), false);
                self.environment
                    .define(decl.name.lexeme.clone(), Value::Function(Rc::new(function)));
                Ok(())
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                Err(ControlFlow::Return(value))
            }
            Stmt::Class {
                name,
                superclass,
                methods,
            } => self.execute_class(name, superclass.as_ref(), methods),
        }
    }

    fn execute_class(
        &mut self,
        name: &crate::token::Token,
        superclass_expr: Option<&Expr>,
        methods: &[Rc<crate::ast::FunctionDecl>],
    ) -> EvalResult<()> {
        let superclass = match superclass_expr {
            Some(expr) => {
                let value = self.evaluate(expr)?;
                match value {
                    Value::Class(class) => Some(class),
                    _ => {
                        let token = match expr {
                            Expr::Variable { name, .. } => name.clone(),
                            _ => name.clone(),
                        };
                        return Err(RuntimeError {
                            message: "Superclass must be a class.".to_string(),
                            token,
                        }
                        .into());
                    }
                }
            }
            None => None,
        };

        self.environment.define(name.lexeme.clone(), Value::Nil);

        let method_env = if let Some(superclass) = &superclass {
            let env = Environment::with_enclosing(self.environment.clone());
            env.define("super", Value::Class(superclass.clone()));
            env
        } else {
            self.environment.clone()
        };

        let mut class_methods = HashMap::new();
        for method in methods {
            let is_initializer = method.name.lexeme == "init";
            let function = LoxFunction::new(method.clone(), method_env.clone(), is_initializer);
            class_methods.insert(method.name.lexeme.clone(), Rc::new(function));
        }

        let class = LoxClass::new(name.lexeme.clone(), superclass, class_methods);
        self.environment
            .assign(name, Value::Class(Rc::new(class)))
            .map_err(ControlFlow::from)?;
        Ok(())
    }

    /// Swaps in `env` for the block's duration, restoring the caller's
    /// environment on every exit path — early return, propagated error, or
    /// falling off the end.
    pub fn execute_block(&mut self, statements: &[Stmt], env: Environment) -> EvalResult<()> {
        let previous = std::mem::replace(&mut self.environment, env);
        let result = (|| {
            for stmt in statements {
                self.execute(stmt)?;
            }
            Ok(())
        })();
        self.environment = previous;
        result
    }

    fn evaluate(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(match value {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::string(s.clone()),
                LiteralValue::Bool(b) => Value::Bool(*b),
                LiteralValue::Nil => Value::Nil,
            }),
            Expr::Grouping { inner, .. } => self.evaluate(inner),
            Expr::Unary { op, right, .. } => self.evaluate_unary(op, right),
            Expr::Binary {
                left, op, right, ..
            } => self.evaluate_binary(left, op, right),
            Expr::Logical {
                left, op, right, ..
            } => self.evaluate_logical(left, op, right),
            Expr::Variable { id, name } => self.look_up_variable(*id, name),
            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;
                match self.locals.get(id) {
                    Some(&depth) => self.environment.assign_at(depth, name, value.clone()),
                    None => self
                        .globals
                        .assign(name, value.clone())
                        .map_err(ControlFlow::from)?,
                }
                Ok(value)
            }
            Expr::Call {
                callee, paren, args, ..
            } => self.evaluate_call(callee, paren, args),
            Expr::Get { object, name, .. } => {
                let object = self.evaluate(object)?;
                match object {
                    Value::Instance(instance) => {
                        LoxInstance::get(&instance, name).map_err(ControlFlow::from)
                    }
                    _ => Err(RuntimeError {
                        message: "Only instances have properties.".to_string(),
                        token: name.clone(),
                    }
                    .into()),
                }
            }
            Expr::Set {
                object,
                name,
                value,
                ..
            } => {
                let object = self.evaluate(object)?;
                let Value::Instance(instance) = object else {
                    return Err(RuntimeError {
                        message: "Only instances have fields.".to_string(),
                        token: name.clone(),
                    }
                    .into());
                };
                let value = self.evaluate(value)?;
                instance.borrow().set(name, value.clone());
                Ok(value)
            }
            Expr::This { id, keyword } => self.look_up_variable(*id, keyword),
            Expr::Super { id, keyword, method } => self.evaluate_super(*id, keyword, method),
        }
    }

    fn look_up_variable(&self, id: NodeId, name: &crate::token::Token) -> EvalResult<Value> {
        match self.locals.get(&id) {
            Some(&depth) => Ok(self.environment.get_at(depth, &name.lexeme)),
            None => self.globals.get(name).map_err(Into::into),
        }
    }

    fn evaluate_super(
        &mut self,
        id: NodeId,
        keyword: &crate::token::Token,
        method: &crate::token::Token,
    ) -> EvalResult<Value> {
        let depth = *self
            .locals
            .get(&id)
            .expect("resolver always records a depth for `super`");
        let superclass = self.environment.get_at(depth, "super");
        let Value::Class(superclass) = superclass else {
            unreachable!("`super` always resolves to a class value");
        };
        let instance = self.environment.get_at(depth - 1, "this");

        let Some(bound_method) = superclass.find_method(&method.lexeme) else {
            return Err(RuntimeError {
                message: format!("Undefined property '{}'.", method.lexeme),
                token: keyword.clone(),
            }
            .into());
        };
        Ok(Value::Function(Rc::new(bound_method.bind(instance))))
    }

    fn evaluate_logical(
        &mut self,
        left: &Expr,
        op: &crate::token::Token,
        right: &Expr,
    ) -> EvalResult<Value> {
        let left = self.evaluate(left)?;
        match op.kind {
            TokenKind::Or if left.is_truthy() => Ok(left),
            TokenKind::Or => self.evaluate(right),
            TokenKind::And if !left.is_truthy() => Ok(left),
            TokenKind::And => self.evaluate(right),
            _ => unreachable!("parser only builds Logical with `and`/`or`"),
        }
    }

    fn evaluate_unary(&mut self, op: &crate::token::Token, right: &Expr) -> EvalResult<Value> {
        let right = self.evaluate(right)?;
        match op.kind {
            TokenKind::Minus => match right {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Err(RuntimeError {
                    message: "Operand must be a number.".to_string(),
                    token: op.clone(),
                }
                .into()),
            },
            TokenKind::Bang => Ok(Value::Bool(!right.is_truthy())),
            _ => unreachable!("parser only builds Unary with `-`/`!`"),
        }
    }

    fn evaluate_binary(
        &mut self,
        left: &Expr,
        op: &crate::token::Token,
        right: &Expr,
    ) -> EvalResult<Value> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        let number_operand_error = || {
            RuntimeError {
                message: "Operands must be numbers.".to_string(),
                token: op.clone(),
            }
            .into()
        };

        match op.kind {
            TokenKind::Minus => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),
                _ => Err(number_operand_error()),
            },
            TokenKind::Slash => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a / b)),
                _ => Err(number_operand_error()),
            },
            TokenKind::Star => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),
                _ => Err(number_operand_error()),
            },
            TokenKind::Plus => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => {
                    Ok(Value::string(format!("{a}{b}")))
                }
                _ => Err(RuntimeError {
                    message: "Operands must be two numbers or two strings.".to_string(),
                    token: op.clone(),
                }
                .into()),
            },
            TokenKind::Greater => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a > b)),
                _ => Err(number_operand_error()),
            },
            TokenKind::GreaterEqual => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a >= b)),
                _ => Err(number_operand_error()),
            },
            TokenKind::Less => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a < b)),
                _ => Err(number_operand_error()),
            },
            TokenKind::LessEqual => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a <= b)),
                _ => Err(number_operand_error()),
            },
            TokenKind::BangEqual => Ok(Value::Bool(!left.is_equal(&right))),
            TokenKind::EqualEqual => Ok(Value::Bool(left.is_equal(&right))),
            _ => unreachable!("parser only builds Binary with arithmetic/comparison operators"),
        }
    }

    fn evaluate_call(
        &mut self,
        callee: &Expr,
        paren: &crate::token::Token,
        args: &[Expr],
    ) -> EvalResult<Value> {
        let callee = self.evaluate(callee)?;

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.evaluate(arg)?);
        }

        let arity = match &callee {
            Value::Function(f) => f.arity(),
            Value::NativeFunction(f) => f.arity(),
            Value::Class(c) => c.arity(),
            _ => {
                return Err(RuntimeError {
                    message: "Can only call functions and classes.".to_string(),
                    token: paren.clone(),
                }
                .into())
            }
        };

        if values.len() != arity {
            return Err(RuntimeError {
                message: format!("Expected {arity} arguments but got {}.", values.len()),
                token: paren.clone(),
            }
            .into());
        }

        match callee {
            Value::Function(f) => f.call(self, values),
            Value::NativeFunction(f) => f.call(self, values),
            Value::Class(c) => c.instantiate(self, values),
            _ => unreachable!("checked above"),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;
    use crate::resolver::Resolver;

    fn run(src: &str) -> (Interpreter, Reporter) {
        let mut reporter = Reporter::new();
        let tokens = Lexer::new(src).scan_tokens(&mut reporter);
        let statements = Parser::new(tokens, &mut reporter).parse();
        let mut interpreter = Interpreter::new();
        Resolver::new(&mut interpreter, &mut reporter).resolve(&statements);
        if !reporter.had_error() {
            interpreter.interpret(&statements, &mut reporter);
        }
        (interpreter, reporter)
    }

    #[test]
    fn arithmetic_precedence() {
        let (interp, reporter) = run("var x = 1 + 2 * 3;");
        let token = crate::token::Token::new(
            crate::token::TokenKind::Identifier,
            "x",
            crate::token::Literal::None,
            1,
        );
        assert_eq!(interp.globals.get(&token).unwrap(), Value::Number(7.0));
        assert!(!reporter.had_error());
    }

    #[test]
    fn string_concatenation() {
        let (interp, _) = run("var s = \"foo\" + \"bar\";");
        let token = crate::token::Token::new(
            crate::token::TokenKind::Identifier,
            "s",
            crate::token::Literal::None,
            1,
        );
        assert_eq!(interp.globals.get(&token).unwrap(), Value::string("foobar"));
    }

    #[test]
    fn division_by_zero_is_infinity_not_a_crash() {
        let (interp, reporter) = run("var r = 1 / 0;");
        assert!(!reporter.had_runtime_error());
        let token = crate::token::Token::new(
            crate::token::TokenKind::Identifier,
            "r",
            crate::token::Literal::None,
            1,
        );
        assert_eq!(interp.globals.get(&token).unwrap(), Value::Number(f64::INFINITY));
    }

    #[test]
    fn closures_capture_their_defining_environment() {
        let (interp, reporter) = run(
            "fun makeCounter() { var i = 0; fun count() { i = i + 1; return i; } return count; } \
             var counter = makeCounter(); \
             var a = counter(); \
             var b = counter();",
        );
        assert!(!reporter.had_runtime_error());
        let token = |n: &str| {
            crate::token::Token::new(crate::token::TokenKind::Identifier, n, crate::token::Literal::None, 1)
        };
        assert_eq!(interp.globals.get(&token("a")).unwrap(), Value::Number(1.0));
        assert_eq!(interp.globals.get(&token("b")).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn class_inheritance_and_super() {
        let (_interp, reporter) = run(
            "class Animal { speak() { return \"...\"; } } \
             class Dog < Animal { speak() { return super.speak(); } } \
             var d = Dog(); \
             var s = d.speak();",
        );
        assert!(!reporter.had_runtime_error());
        assert!(!reporter.had_error());
    }
}
