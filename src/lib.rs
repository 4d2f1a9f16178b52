//! # tslite
//!
//! tslite is a small, TypeScript-like language written in Rust.
//! It tokenizes and parses programs, checks them with a structural type
//! checker, and runs them with a tree-walking interpreter.
//!
//! The stages can be used one by one ([`compile`], [`check`], [`run`]) or
//! chained with [`run_source`].

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use tracing::debug;

use crate::{
    ast::Program,
    error::{CompileError, Error, RuntimeError, TypeError},
    interpreter::{
        checker::core::check_program, evaluator::core::Context, lexer::tokenize,
        parser::core::parse_program,
    },
    options::{Mode, Options},
};

/// Defines the structure of parsed code.
///
/// This module declares the `Statement` and `Expr` enums, type annotations and
/// interface declarations that represent a program as a tree. The AST is built
/// by the parser, read by the type checker and executed by the evaluator.
///
/// # Responsibilities
/// - Defines statement, expression and annotation types for all language
///   constructs.
/// - Attaches source positions to AST nodes for error reporting.
pub mod ast;
/// Provides unified error types for every stage.
///
/// This module defines all errors that can be raised while lexing, parsing,
/// type checking or evaluating code. Every error carries the source position
/// it refers to and prints as `Error on line L, column C: ...`.
///
/// # Responsibilities
/// - Defines one error enum per stage.
/// - Wraps them for the chained pipeline.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, type checking, evaluation and
/// value representations.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, checker, evaluator, and
///   value types.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// Settings for running programs.
///
/// Selects checked or unchecked execution, bounds the call depth and
/// controls whether output is echoed to stdout.
pub mod options;
/// General helpers.
///
/// Source positions and number formatting used by several stages.
pub mod util;

/// Tokenizes and parses source text.
///
/// # Errors
/// The first lexical or syntax error.
///
/// # Example
/// ```
/// use tslite::compile;
///
/// let program = compile("let x: number = 1;").unwrap();
/// assert_eq!(program.statements.len(), 1);
///
/// assert!(compile("let = 1;").is_err());
/// ```
pub fn compile(source: &str) -> Result<Program, CompileError> {
    let tokens = tokenize(source)?;
    debug!(tokens = tokens.len(), "tokenized");
    let program = parse_program(&tokens)?;
    Ok(program)
}

/// Type-checks a program.
///
/// # Returns
/// Every diagnostic found, in source order per stage; empty if the program is
/// type-consistent.
///
/// # Example
/// ```
/// use tslite::{check, compile};
///
/// let ok = compile("let s: string = 'a'; s = 'b';").unwrap();
/// let bad = compile("let s: string = 'a'; s = 1;").unwrap();
///
/// assert!(check(&ok).is_empty());
/// assert_eq!(check(&bad).len(), 1);
/// ```
#[must_use]
pub fn check(program: &Program) -> Vec<TypeError> {
    let diagnostics = check_program(program);
    debug!(diagnostics = diagnostics.len(), "checked");
    diagnostics
}

/// What running a program produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Lines written by `console.log`, including those written before an
    /// error.
    pub output: Vec<String>,
    /// The runtime error that stopped the program, if any.
    pub error:  Option<RuntimeError>,
}

/// Runs a program without checking it.
///
/// # Example
/// ```
/// use tslite::{compile, options::Options, run};
///
/// let program = compile("console.log('a'); console.log(1 / 0);").unwrap();
/// let outcome = run(&program, &Options::default());
///
/// assert_eq!(outcome.output, vec!["a"]);
/// assert!(outcome.error.is_some());
/// ```
#[must_use]
pub fn run(program: &Program, options: &Options) -> RunOutcome {
    let mut context = Context::new(options);
    let error = context.run_program(program).err();
    if let Some(error) = &error {
        debug!(%error, "runtime error");
    }

    RunOutcome { output: std::mem::take(&mut context.output),
                 error }
}

/// The result of [`run_source`].
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    /// Lines written before the run finished or failed. Empty when the
    /// program did not compile or did not pass the checker.
    pub output: Vec<String>,
    /// The error that stopped the pipeline, if any.
    pub error:  Option<Error>,
}

impl Execution {
    /// Converts the execution into its output, or the error that stopped it.
    pub fn into_result(self) -> Result<Vec<String>, Error> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.output),
        }
    }
}

/// Compiles, checks and runs source text.
///
/// In [`Mode::Checked`] the program only runs if the checker reports nothing;
/// in [`Mode::Unchecked`] the checker is skipped.
///
/// # Example
/// ```
/// use tslite::{
///     options::{Mode, Options},
///     run_source,
/// };
///
/// let source = "let n: number = 'one'; console.log(n);";
///
/// let checked = run_source(source, &Options::default());
/// assert!(checked.output.is_empty());
/// assert!(checked.error.is_some());
///
/// let unchecked = run_source(source, &Options::default().with_mode(Mode::Unchecked));
/// assert_eq!(unchecked.into_result().unwrap(), vec!["one"]);
/// ```
#[must_use]
pub fn run_source(source: &str, options: &Options) -> Execution {
    let program = match compile(source) {
        Ok(program) => program,
        Err(error) => return Execution { output: Vec::new(),
                                         error:  Some(error.into()), },
    };

    if options.mode == Mode::Checked {
        let diagnostics = check(&program);
        if !diagnostics.is_empty() {
            return Execution { output: Vec::new(),
                               error:  Some(Error::Check(diagnostics)), };
        }
    }

    let outcome = run(&program, options);
    Execution { output: outcome.output,
                error:  outcome.error.map(Error::from), }
}
