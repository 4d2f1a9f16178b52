/// The static type representation.
///
/// Defines [`Type`](core::Type) and its parts: primitives, object shapes and
/// function signatures, plus the union and intersection constructors.
pub mod core;

/// Structural assignability between types.
///
/// Implements the compatibility relation used for every check: width
/// subtyping for objects, contravariant parameters for functions, and the
/// union and intersection rules.
pub mod compat;

/// The interface table.
///
/// Collects interface declarations and resolves written annotations into
/// types.
pub mod env;
