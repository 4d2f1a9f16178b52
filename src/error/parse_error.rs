use thiserror::Error;

use crate::util::position::Position;

/// Represents all errors that can occur during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Found a token that does not fit the construct being parsed.
    #[error("Error on {position}: Expected {expected}, found {found}.")]
    UnexpectedToken {
        /// Description of the construct that was expected.
        expected: String,
        /// Description of the token that was found.
        found:    String,
        /// Where the offending token starts.
        position: Position,
    },
    /// Reached the end of input while a construct was still open.
    #[error("Error on {position}: Unexpected end of input, expected {expected}.")]
    UnexpectedEndOfInput {
        /// Description of the construct that was expected.
        expected: String,
        /// Position of the end of input.
        position: Position,
    },
    /// The left side of an assignment or update is not a variable or a
    /// property access.
    #[error("Error on {position}: Invalid assignment target.")]
    InvalidAssignmentTarget {
        /// Where the target expression starts.
        position: Position,
    },
    /// A declaration that is only allowed at the top level of a program was
    /// found inside a block.
    #[error("Error on {position}: {construct} is only allowed at the top level.")]
    NotAtTopLevel {
        /// The kind of declaration, e.g. `interface declaration`.
        construct: &'static str,
        /// Where the declaration starts.
        position:  Position,
    },
    /// Expressions, statements or type annotations nested deeper than the
    /// parser accepts.
    #[error("Error on {position}: Maximum nesting depth of {limit} exceeded.")]
    TooDeeplyNested {
        /// The maximum nesting depth.
        limit:    usize,
        /// Where the construct that exceeded the limit starts.
        position: Position,
    },
}

impl ParseError {
    /// Returns the position the error points at.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::UnexpectedToken { position, .. }
            | Self::UnexpectedEndOfInput { position, .. }
            | Self::InvalidAssignmentTarget { position }
            | Self::NotAtTopLevel { position, .. }
            | Self::TooDeeplyNested { position, .. } => *position,
        }
    }
}
