/// Lexing errors.
///
/// Defines the errors raised while scanning source text into tokens, such as
/// unterminated strings and characters that cannot start any token.
pub mod lex_error;
/// Parsing errors.
///
/// Defines all error types that can occur while building the syntax tree from
/// tokens. Parse errors name the expected construct and the offending token.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation and
/// execution, such as unknown variables, calls to non-functions, or division
/// by zero.
pub mod runtime_error;
/// Static type errors.
///
/// Contains the diagnostics produced by the type checker. Unlike the other
/// stages, the checker collects every diagnostic instead of stopping at the
/// first one.
pub mod type_error;

pub use lex_error::LexError;
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
use thiserror::Error;
pub use type_error::TypeError;

/// Errors that stop compilation: lexing or parsing failed.
///
/// Both stages are fatal, so at most one of these is ever produced for a
/// source text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// The source text could not be tokenized.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// The token stream could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Any error produced by the full pipeline.
///
/// Returned by [`crate::run_source`], which chains compilation, checking and
/// evaluation and reports whichever stage failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Compilation failed.
    #[error(transparent)]
    Compile(#[from] CompileError),
    /// Type checking reported one or more diagnostics.
    #[error("{}", join_lines(.0))]
    Check(Vec<TypeError>),
    /// Evaluation failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Joins diagnostics one per line.
fn join_lines(errors: &[TypeError]) -> String {
    errors.iter()
          .map(ToString::to_string)
          .collect::<Vec<_>>()
          .join("\n")
}
