/// Function calls.
///
/// Resolves callees and receivers, checks argument counts and the call depth
/// limit, and runs user-defined and native functions.
pub mod core;

/// The `console` builtins.
///
/// Writes the display strings of values to the program output.
pub mod console;
