/// A 1-based line and column inside the source text.
///
/// Positions are produced by the lexer and copied into every AST node and
/// every diagnostic. They are `Copy` so that they can be passed around freely.
///
/// # Example
/// ```
/// use tslite::util::position::Position;
///
/// let pos = Position::new(3, 14);
/// assert_eq!(pos.to_string(), "line 3, column 14");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// The line, starting at 1.
    pub line:   usize,
    /// The column, starting at 1, counted in characters.
    pub column: usize,
}

impl Position {
    /// Creates a position from a line and column.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}
