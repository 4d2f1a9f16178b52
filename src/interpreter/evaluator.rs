/// Binary operator evaluation logic.
///
/// Handles the execution of all binary operations in expressions, including
/// arithmetic, string concatenation, comparisons and the short-circuiting
/// logical operators.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements arithmetic negation, logical NOT and the `++`/`--` updates.
pub mod unary;

/// Core evaluation logic and context management.
///
/// Contains the main evaluation engine, the runtime context, statement
/// completions and function hoisting.
pub mod core;

/// Lexical environments.
///
/// Parent-linked, shared frames for variables and `this`, and the heap that
/// releases them once a run is over.
pub mod environment;

/// Evaluation of loops.
///
/// Runs C-style `for` loops and `while` loops, each iteration in a fresh
/// frame.
pub mod for_loop;

/// Utility functions for evaluation.
///
/// Property access and the assignable places shared by assignments and
/// updates.
pub mod utils;

/// Function evaluation.
///
/// Handles user-defined and built-in function calls, argument checking, and
/// return value computation.
pub mod function;
