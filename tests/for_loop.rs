//! Scenario 6: `for` loop desugaring into an initializer/while/increment block.

use lox_lang::interpreter::Interpreter;
use lox_lang::token::{Literal, Token, TokenKind};
use lox_lang::value::Value;

fn var(name: &str) -> Token {
    Token::new(TokenKind::Identifier, name, Literal::None, 1)
}

#[test]
fn for_loop_accumulates_expected_sum() {
    let mut interpreter = Interpreter::new();
    let outcome = lox_lang::run(
        "var sum = 0; \
         for (var i = 0; i < 5; i = i + 1) { \
           sum = sum + i; \
         }",
        &mut interpreter,
    );

    assert!(!outcome.had_error);
    assert!(!outcome.had_runtime_error);
    assert_eq!(interpreter.globals.get(&var("sum")).unwrap(), Value::Number(10.0));
}

#[test]
fn for_loop_variable_does_not_leak_past_the_loop() {
    let mut interpreter = Interpreter::new();
    let outcome = lox_lang::run(
        "for (var i = 0; i < 3; i = i + 1) {} \
         print i;",
        &mut interpreter,
    );

    assert!(outcome.had_runtime_error);
}
