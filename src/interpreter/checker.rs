/// Checker state and entry point.
///
/// Holds the scopes, function frames and diagnostics, and provides
/// [`check_program`](core::check_program).
pub mod core;

/// Expression checking.
///
/// Computes the type of every expression and reports operator, call and
/// property errors.
pub mod expr;

/// Name bindings.
///
/// Scope handling for declared and inferred variable types.
pub mod scope;

/// Statement checking.
///
/// Declarations, control flow conditions, returns, and hoisting of function
/// declarations.
pub mod statement;
