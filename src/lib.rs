//! `lox_lang` implements the tree-walking pipeline (lex -> parse -> resolve
//! -> evaluate) behind the `loxi` binary, and exposes the same pipeline as a
//! library entry point for embedding and for integration tests.

pub mod ast;
pub mod class;
pub mod environment;
pub mod error;
pub mod function;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod resolver;
pub mod token;
pub mod value;

use error::Reporter;
use interpreter::Interpreter;
use lexer::Lexer;
use parser::Parser;
use resolver::Resolver;

/// Result of running one source unit through the whole pipeline.
pub struct RunOutcome {
    pub had_error: bool,
    pub had_runtime_error: bool,
}

/// Runs `source` against a fresh `Interpreter`, or against `interpreter` when
/// one is supplied so a REPL can keep state across lines.
///
/// Stops after lexing/parsing/resolving if any of those stages reported an
/// error — matching jlox's refusal to execute a program that failed static
/// checks.
pub fn run(source: &str, interpreter: &mut Interpreter) -> RunOutcome {
    let mut reporter = Reporter::new();

    let tokens = Lexer::new(source).scan_tokens(&mut reporter);
    let statements = Parser::new(tokens, &mut reporter).parse();

    if reporter.had_error() {
        return RunOutcome {
            had_error: true,
            had_runtime_error: false,
        };
    }

    Resolver::new(interpreter, &mut reporter).resolve(&statements);

    if reporter.had_error() {
        return RunOutcome {
            had_error: true,
            had_runtime_error: false,
        };
    }

    interpreter.interpret(&statements, &mut reporter);

    RunOutcome {
        had_error: reporter.had_error(),
        had_runtime_error: reporter.had_runtime_error(),
    }
}

/// Convenience wrapper for one-shot runs (file mode, tests) that don't need
/// to keep interpreter state around afterward.
pub fn run_source(source: &str) -> RunOutcome {
    let mut interpreter = Interpreter::new();
    run(source, &mut interpreter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_program_reports_no_errors() {
        let outcome = run_source("print 1 + 2 * 3;");
        assert!(!outcome.had_error);
        assert!(!outcome.had_runtime_error);
    }

    #[test]
    fn lexical_errors_prevent_execution() {
        let outcome = run_source("var a = @;");
        assert!(outcome.had_error);
        assert!(!outcome.had_runtime_error);
    }

    #[test]
    fn resolver_errors_prevent_execution() {
        let outcome = run_source("return 1;");
        assert!(outcome.had_error);
        assert!(!outcome.had_runtime_error);
    }

    #[test]
    fn runtime_errors_surface_distinctly() {
        let outcome = run_source("print 1 + \"two\";");
        assert!(!outcome.had_error);
        assert!(outcome.had_runtime_error);
    }
}
