//! # Cli
//!
//! This module contains everything needed for parsing the CLI arguments for loxi.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Struct containing the CLI configuration for loxi.
#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Specify the log level of the interpreter.
    #[arg(value_enum, short, long, default_value_t = LogLevel::default())]
    pub verbosity: LogLevel,
}

impl Cli {
    pub fn init() -> Self {
        Cli::parse()
    }
}

/// Enum for specifying the log level of loxi.
#[derive(ValueEnum, Clone, Default, Debug)]
pub enum LogLevel {
    /// The default log level. Only critical errors will be logged.
    #[default]
    #[value(alias("0"))]
    Error,

    /// Also logs warnings.
    #[value(alias("1"))]
    Warn,

    /// Also logs information about the run, e.g. which file is being executed.
    #[value(alias("2"))]
    Info,

    /// Logs everything the interpreter does internally.
    #[value(alias("3"))]
    Debug,

    /// Logs extra information, including token/AST dumps.
    #[value(alias("4"))]
    Trace,
}

impl From<&LogLevel> for log::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a Lox source file.
    Run(RunArgs),

    /// Start an interactive REPL.
    Repl,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// The path to the Lox source file.
    #[arg(index = 1)]
    pub file: std::path::PathBuf,

    /// Whether to dump the token stream (for debugging).
    #[arg(long)]
    pub dump_tokens: bool,

    /// Whether to dump the parsed AST (for debugging).
    #[arg(long)]
    pub dump_ast: bool,
}
