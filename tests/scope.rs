//! Scenario 3: block scoping and shadowing.

use lox_lang::interpreter::Interpreter;
use lox_lang::token::{Literal, Token, TokenKind};
use lox_lang::value::Value;

fn var(name: &str) -> Token {
    Token::new(TokenKind::Identifier, name, Literal::None, 1)
}

#[test]
fn inner_block_shadows_without_mutating_outer() {
    let mut interpreter = Interpreter::new();
    let outcome = lox_lang::run(
        "var a = \"outer\"; \
         var innerSeen; \
         { \
           var a = \"inner\"; \
           innerSeen = a; \
         }",
        &mut interpreter,
    );

    assert!(!outcome.had_error);
    assert!(!outcome.had_runtime_error);
    assert_eq!(
        interpreter.globals.get(&var("a")).unwrap(),
        Value::string("outer")
    );
    assert_eq!(
        interpreter.globals.get(&var("innerSeen")).unwrap(),
        Value::string("inner")
    );
}

#[test]
fn assignment_in_block_mutates_outer_binding() {
    let mut interpreter = Interpreter::new();
    let outcome = lox_lang::run("var a = 1; { a = 2; }", &mut interpreter);

    assert!(!outcome.had_error);
    assert!(!outcome.had_runtime_error);
    assert_eq!(
        interpreter.globals.get(&var("a")).unwrap(),
        Value::Number(2.0)
    );
}
