use thiserror::Error;

use crate::util::position::Position;

/// Represents the diagnostics reported by the type checker.
///
/// Types are carried as their printed form so that diagnostics stay
/// independent of the type model's lifetime and are easy to compare in tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// A type annotation names an interface that was never declared.
    #[error("Error on {position}: Unknown type '{name}'.")]
    UnknownType {
        /// The unresolved name.
        name:     String,
        /// Where the name appears.
        position: Position,
    },
    /// A value's type is not assignable to the type required at its position.
    #[error("Error on {position}: Type '{found}' is not assignable to type '{expected}'.")]
    TypeMismatch {
        /// The required type.
        expected: String,
        /// The type that was supplied.
        found:    String,
        /// Where the offending expression starts.
        position: Position,
    },
    /// A call expression whose callee is not a function.
    #[error("Error on {position}: Type '{found}' is not callable.")]
    NotCallable {
        /// The type of the callee.
        found:    String,
        /// Where the call appears.
        position: Position,
    },
    /// A property access on a type that does not declare that property.
    #[error("Error on {position}: Property '{property}' does not exist on type '{on}'.")]
    UnknownProperty {
        /// The property name.
        property: String,
        /// The type the property was looked up on.
        on:       String,
        /// Where the access appears.
        position: Position,
    },
    /// A reference to a variable that is not declared in any enclosing scope.
    #[error("Error on {position}: Cannot find name '{name}'.")]
    UnknownName {
        /// The variable name.
        name:     String,
        /// Where the reference appears.
        position: Position,
    },
    /// A call with fewer or more arguments than the callee accepts.
    #[error("Error on {position}: Expected {expected} arguments, but got {found}.")]
    ArgumentCountMismatch {
        /// The accepted argument count, e.g. `2` or `1-2`.
        expected: String,
        /// The supplied argument count.
        found:    usize,
        /// Where the call appears.
        position: Position,
    },
    /// A name declared twice in the same scope, or an interface declared
    /// twice.
    #[error("Error on {position}: Duplicate declaration '{name}'.")]
    DuplicateDeclaration {
        /// The duplicated name.
        name:     String,
        /// Where the second declaration appears.
        position: Position,
    },
    /// A `return` statement outside of any function body.
    #[error("Error on {position}: A 'return' statement can only be used within a function body.")]
    ReturnOutsideFunction {
        /// Where the statement appears.
        position: Position,
    },
}

impl TypeError {
    /// Returns the position the diagnostic points at.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::UnknownType { position, .. }
            | Self::TypeMismatch { position, .. }
            | Self::NotCallable { position, .. }
            | Self::UnknownProperty { position, .. }
            | Self::UnknownName { position, .. }
            | Self::ArgumentCountMismatch { position, .. }
            | Self::DuplicateDeclaration { position, .. }
            | Self::ReturnOutsideFunction { position } => *position,
        }
    }
}
