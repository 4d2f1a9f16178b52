/// Number formatting helpers.
///
/// This module converts the interpreter's `f64` numbers into the text the
/// language prints for them. Integral values print without a fractional part,
/// just like the scripting languages this dialect is modelled on.
pub mod num;
/// Source positions.
///
/// Defines the `Position` type attached to every token, AST node and
/// diagnostic so that errors can point back at the offending source text.
pub mod position;
