use thiserror::Error;

use crate::util::position::Position;

/// Represents all errors that can occur while tokenizing source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A string literal was not closed before the end of its line.
    #[error("Error on {position}: Unterminated string literal.")]
    UnterminatedString {
        /// Where the string literal starts.
        position: Position,
    },
    /// A character that cannot start any token.
    #[error("Error on {position}: Unexpected character '{character}'.")]
    UnexpectedCharacter {
        /// The offending text.
        character: String,
        /// Where the character appears.
        position:  Position,
    },
}

impl LexError {
    /// Returns the position the error points at.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::UnterminatedString { position } | Self::UnexpectedCharacter { position, .. } => {
                *position
            },
        }
    }
}
