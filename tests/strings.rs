//! Scenario 2: string concatenation.

use lox_lang::interpreter::Interpreter;
use lox_lang::token::{Literal, Token, TokenKind};
use lox_lang::value::Value;

fn var(name: &str) -> Token {
    Token::new(TokenKind::Identifier, name, Literal::None, 1)
}

#[test]
fn concatenates_string_literals() {
    let mut interpreter = Interpreter::new();
    let outcome = lox_lang::run(
        r#"var greeting = "Hello, " + "World!";"#,
        &mut interpreter,
    );

    assert!(!outcome.had_error);
    assert!(!outcome.had_runtime_error);
    assert_eq!(
        interpreter.globals.get(&var("greeting")).unwrap(),
        Value::string("Hello, World!")
    );
}

#[test]
fn adding_number_and_string_is_a_runtime_error() {
    let mut interpreter = Interpreter::new();
    let outcome = lox_lang::run(r#"print 1 + "two";"#, &mut interpreter);

    assert!(!outcome.had_error);
    assert!(outcome.had_runtime_error);
}
