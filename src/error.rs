//! Error taxonomy and the process-wide-state-as-a-value reporter.
//!
//! Each stage gets its own plain error struct, the same shape the teacher
//! uses for its own `ParseError`/`TypeError`: a message plus enough position
//! context to print a line-annotated diagnostic, `Display + std::error::Error`
//! and nothing more.

use std::error::Error;
use std::fmt::{self, Display};

use crate::token::{Token, TokenKind};

#[derive(Debug, Clone)]
pub struct LexicalError {
    pub message: String,
    pub line: usize,
}

impl Display for LexicalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error: {}", self.line, self.message)
    }
}

impl Error for LexicalError {}

#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub token: Token,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error: {}", self.token.line, self.message)
    }
}

impl Error for ParseError {}

#[derive(Debug, Clone)]
pub struct ResolveError {
    pub message: String,
    pub token: Token,
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error: {}", self.token.line, self.message)
    }
}

impl Error for ResolveError {}

#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub message: String,
    pub token: Token,
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n[line {}]", self.message, self.token.line)
    }
}

impl Error for RuntimeError {}

/// Unifies the four stage errors for the evaluator's `Result` signature.
/// After resolution succeeds, only the `Runtime` variant can be produced.
#[derive(Debug, Clone)]
pub enum LoxError {
    Lexical(LexicalError),
    Parse(ParseError),
    Resolve(ResolveError),
    Runtime(RuntimeError),
}

impl Display for LoxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoxError::Lexical(e) => Display::fmt(e, f),
            LoxError::Parse(e) => Display::fmt(e, f),
            LoxError::Resolve(e) => Display::fmt(e, f),
            LoxError::Runtime(e) => Display::fmt(e, f),
        }
    }
}

impl Error for LoxError {}

impl From<RuntimeError> for LoxError {
    fn from(value: RuntimeError) -> Self {
        LoxError::Runtime(value)
    }
}

/// Threaded explicitly through lex/parse/resolve instead of living as
/// process-global state, per the corpus's own preference for an explicit
/// value over a `static`.
#[derive(Debug, Default)]
pub struct Reporter {
    had_error: bool,
    had_runtime_error: bool,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Clears both flags. Used by the REPL between lines so one bad line
    /// does not poison the rest of the session.
    pub fn reset(&mut self) {
        self.had_error = false;
        self.had_runtime_error = false;
    }

    pub fn error(&mut self, line: usize, message: impl Into<String>) {
        self.report(line, "", message);
    }

    pub fn error_at_token(&mut self, token: &Token, message: impl Into<String>) {
        let message = message.into();
        if token.kind == TokenKind::Eof {
            self.report(token.line, " at end", message);
        } else {
            self.report(token.line, &format!(" at '{}'", token.lexeme), message);
        }
    }

    fn report(&mut self, line: usize, location: &str, message: impl Into<String>) {
        eprintln!("[line {line}] Error{location}: {}", message.into());
        self.had_error = true;
    }

    pub fn runtime_error(&mut self, error: &RuntimeError) {
        eprintln!("{error}");
        self.had_runtime_error = true;
    }
}

pub type EvalResult<T> = Result<T, ControlFlow>;

/// Either a genuine runtime error or a `return` unwinding to its call frame.
/// Kept as a dedicated, non-`LoxError` variant so the evaluator's `?`-based
/// control flow never confuses an actual failure with a `return` in flight.
pub enum ControlFlow {
    Error(LoxError),
    Return(crate::value::Value),
}

impl From<RuntimeError> for ControlFlow {
    fn from(value: RuntimeError) -> Self {
        ControlFlow::Error(LoxError::Runtime(value))
    }
}

impl From<LoxError> for ControlFlow {
    fn from(value: LoxError) -> Self {
        ControlFlow::Error(value)
    }
}
