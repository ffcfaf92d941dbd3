//! Scenario 1: operator precedence through the full pipeline.

use lox_lang::interpreter::Interpreter;
use lox_lang::token::{Literal, Token, TokenKind};

fn var(name: &str) -> Token {
    Token::new(TokenKind::Identifier, name, Literal::None, 1)
}

#[test]
fn arithmetic_precedence_through_full_pipeline() {
    let mut interpreter = Interpreter::new();
    let outcome = lox_lang::run("print 1 + 2 * 3; var result = 1 + 2 * 3;", &mut interpreter);

    assert!(!outcome.had_error);
    assert!(!outcome.had_runtime_error);
    assert_eq!(
        interpreter.globals.get(&var("result")).unwrap().stringify(),
        "7"
    );
}
