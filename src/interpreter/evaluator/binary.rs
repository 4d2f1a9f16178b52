/// Binary operator dispatch and arithmetic.
///
/// Evaluates operands left to right and applies `+ - * / %`, routing
/// comparisons and logical operators to their own modules.
pub mod core;

/// Relational and equality operators.
pub mod comparison;

/// Short-circuiting `&&` and `||`.
pub mod logic;
