/// The `Value` enum and conversions.
///
/// Defines every runtime value and the helpers the evaluator uses to inspect
/// them.
pub mod core;

/// Printing of values.
///
/// Formats values the way `console.log` shows them, including nested
/// objects and reference cycles.
pub mod display;

/// Function values.
///
/// Closures over user-defined functions and native functions.
pub mod function;

/// Object values.
///
/// Mutable, shared property maps that keep insertion order.
pub mod object;
