//! Scenario 4: closures capturing mutable state (counter generator).

use lox_lang::interpreter::Interpreter;
use lox_lang::token::{Literal, Token, TokenKind};
use lox_lang::value::Value;

fn var(name: &str) -> Token {
    Token::new(TokenKind::Identifier, name, Literal::None, 1)
}

#[test]
fn two_counters_from_the_same_factory_have_independent_state() {
    let mut interpreter = Interpreter::new();
    let outcome = lox_lang::run(
        "fun makeCounter() { \
           var count = 0; \
           fun increment() { count = count + 1; return count; } \
           return increment; \
         } \
         var counterA = makeCounter(); \
         var counterB = makeCounter(); \
         var a1 = counterA(); \
         var a2 = counterA(); \
         var b1 = counterB();",
        &mut interpreter,
    );

    assert!(!outcome.had_error);
    assert!(!outcome.had_runtime_error);
    assert_eq!(interpreter.globals.get(&var("a1")).unwrap(), Value::Number(1.0));
    assert_eq!(interpreter.globals.get(&var("a2")).unwrap(), Value::Number(2.0));
    assert_eq!(interpreter.globals.get(&var("b1")).unwrap(), Value::Number(1.0));
}
