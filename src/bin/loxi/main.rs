//! # loxi
//!
//! This binary is the CLI entry point for the Lox tree-walking interpreter.
//! It wires the `lox_lang` pipeline (lexer -> parser -> resolver ->
//! interpreter) to either a single source file or an interactive REPL.

mod cli;

use cli::*;

use std::fs;
use std::io::{self, Write};

use anyhow::{Context, Result};
use log::{debug, info};

use lox_lang::error::Reporter;
use lox_lang::interpreter::Interpreter;
use lox_lang::lexer::Lexer;
use lox_lang::parser::Parser;
use lox_lang::resolver::Resolver;

const EX_DATAERR: i32 = 65;
const EX_SOFTWARE: i32 = 70;

fn main() -> Result<()> {
    let args = Cli::init();
    simple_logger::init_with_level(args.verbosity.into()).unwrap();

    match args.command {
        Commands::Run(run_args) => run_file(run_args),
        Commands::Repl => run_repl(),
    }
}

fn run_file(args: RunArgs) -> Result<()> {
    let source = fs::read_to_string(&args.file)
        .with_context(|| format!("could not read {}", args.file.display()))?;

    info!("running {}", args.file.display());

    let mut reporter = Reporter::new();
    let tokens = Lexer::new(&source).scan_tokens(&mut reporter);

    if args.dump_tokens {
        debug!("tokens:\n{tokens:#?}");
    }

    if reporter.had_error() {
        std::process::exit(EX_DATAERR);
    }

    let statements = Parser::new(tokens, &mut reporter).parse();

    if args.dump_ast {
        debug!("ast:\n{statements:#?}");
    }

    if reporter.had_error() {
        std::process::exit(EX_DATAERR);
    }

    let mut interpreter = Interpreter::new();
    Resolver::new(&mut interpreter, &mut reporter).resolve(&statements);

    if reporter.had_error() {
        std::process::exit(EX_DATAERR);
    }

    interpreter.interpret(&statements, &mut reporter);

    if reporter.had_runtime_error() {
        std::process::exit(EX_SOFTWARE);
    }

    Ok(())
}

/// Each line runs through the full pipeline against a persistent
/// `Interpreter` so top-level `var`/`fun`/`class` declarations survive
/// between lines, but a bad line's errors never poison the ones after it.
fn run_repl() -> Result<()> {
    let mut interpreter = Interpreter::new();
    let stdin = io::stdin();

    loop {
        print!("> ");
        io::stdout().flush().context("failed to flush prompt")?;

        let mut line = String::new();
        if stdin.read_line(&mut line).context("failed to read line")? == 0 {
            println!();
            return Ok(());
        }

        let outcome = lox_lang::run(&line, &mut interpreter);
        if outcome.had_error || outcome.had_runtime_error {
            // A bad line is reported to stderr by the pipeline itself; the
            // REPL just keeps going.
            continue;
        }
    }
}
