/// Core parsing entry points.
///
/// Contains the program and expression entry points, the shared result type,
/// and `if` statement parsing.
pub mod core;

/// Unary and primary expression parsing.
///
/// Handles prefix operators, postfix calls, member accesses and updates, and
/// the atoms of the grammar such as literals and object literals.
pub mod unary;

/// Binary operator parsing.
///
/// Implements the precedence levels from assignment down to multiplication.
pub mod binary;

/// Block parsing.
///
/// Parses brace-delimited statement sequences and loop or branch bodies.
pub mod block;

/// Utility functions for the parser.
///
/// Provides token matching helpers, list parsing, and parameter lists.
pub mod utils;

/// Statement parsing.
///
/// Implements declarations, control flow statements, and expression
/// statements.
pub mod statement;

/// Type annotation parsing.
///
/// Parses named, object, function, union and intersection types, and the
/// member lists of interfaces.
pub mod types;
