use thiserror::Error;

use crate::util::position::Position;

/// Represents all errors that can occur during evaluation and runtime.
///
/// A runtime error halts the run at the failing statement. Output emitted
/// before the failure is kept and returned next to the error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Tried to read or assign a variable that is not defined, or read `this`
    /// outside of a method call.
    #[error("Error on {position}: {name} is not defined.")]
    UnknownVariable {
        /// The name of the variable.
        name:     String,
        /// Where the reference appears.
        position: Position,
    },
    /// Called a value that is not a function.
    #[error("Error on {position}: Value of type {found} is not a function.")]
    NotCallable {
        /// The runtime type of the callee.
        found:    String,
        /// Where the call appears.
        position: Position,
    },
    /// Read or wrote a property of a value that is not an object.
    #[error("Error on {position}: Cannot access property '{property}' of {found}.")]
    UnknownProperty {
        /// The property name.
        property: String,
        /// The runtime type of the accessed value.
        found:    String,
        /// Where the access appears.
        position: Position,
    },
    /// A value had an unexpected or incompatible type.
    #[error("Error on {position}: Expected {expected}, found {found}.")]
    TypeMismatch {
        /// The type that was required.
        expected: String,
        /// The runtime type that was found.
        found:    String,
        /// Where the offending expression starts.
        position: Position,
    },
    /// Attempted division or remainder by zero.
    #[error("Error on {position}: Division by zero.")]
    DivisionByZero {
        /// Where the operation appears.
        position: Position,
    },
    /// The wrong number of arguments was supplied to a function.
    #[error("Error on {position}: Expected {expected} arguments, but got {found}.")]
    ArgumentCountMismatch {
        /// The accepted argument count, e.g. `2` or `1-2`.
        expected: String,
        /// The supplied argument count.
        found:    usize,
        /// Where the call appears.
        position: Position,
    },
    /// Function calls nested deeper than the configured limit.
    #[error("Error on {position}: Maximum call depth of {limit} exceeded.")]
    StackOverflow {
        /// The configured maximum call depth.
        limit:    usize,
        /// Where the call that exceeded the limit appears.
        position: Position,
    },
}

impl RuntimeError {
    /// Returns the position the error points at.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::UnknownVariable { position, .. }
            | Self::NotCallable { position, .. }
            | Self::UnknownProperty { position, .. }
            | Self::TypeMismatch { position, .. }
            | Self::DivisionByZero { position }
            | Self::ArgumentCountMismatch { position, .. }
            | Self::StackOverflow { position, .. } => *position,
        }
    }
}
