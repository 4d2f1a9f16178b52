use logos::Logos;

use crate::{error::LexError, util::position::Position};

/// Represents the kind of a lexical token.
///
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized token kinds; literal kinds carry their
/// decoded payload.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum TokenKind {
    /// Numeric literal tokens, such as `42` or `2.5`.
    #[regex(r"[0-9]+(\.[0-9]+)?", parse_number)]
    Number(f64),
    /// String literal tokens delimited by single or double quotes.
    #[regex(r#""([^"\\\n]|\\.)*""#, parse_string)]
    #[regex(r"'([^'\\\n]|\\.)*'", parse_string)]
    Str(String),
    /// A string literal that reaches the end of the line without its closing
    /// quote. Never handed to the parser.
    #[regex(r#""([^"\\\n]|\\.)*"#)]
    #[regex(r"'([^'\\\n]|\\.)*")]
    UnterminatedString,
    /// Boolean literal tokens, such as `true`.
    #[token("true", parse_bool)]
    #[token("false", parse_bool)]
    Bool(bool),
    /// `undefined`
    #[token("undefined")]
    Undefined,
    /// `null`
    #[token("null")]
    Null,
    /// `interface`
    #[token("interface")]
    Interface,
    /// `function`
    #[token("function")]
    Function,
    /// `let`
    #[token("let")]
    Let,
    /// `return`
    #[token("return")]
    Return,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `export`
    #[token("export")]
    Export,
    /// `for`
    #[token("for")]
    For,
    /// `while`
    #[token("while")]
    While,
    /// `this`
    #[token("this")]
    This,
    /// Identifier tokens; variable, function, property or type names.
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `// Comments.`
    #[regex(r"//[^\n\r]*", logos::skip, allow_greedy = true)]
    Comment,
    /// `/* Multi line comments. */`
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", |lex| {
        let comment = lex.slice();
        if let Some(last) = comment.rfind('\n') {
            lex.extras.line += comment.matches('\n').count();
            lex.extras.line_start = lex.span().start + last + 1;
        }
        logos::Skip
    })]
    MultiLineComment,
    /// `=>`
    #[token("=>")]
    Arrow,
    /// `===`
    #[token("===")]
    EqualEqualEqual,
    /// `!==`
    #[token("!==")]
    BangEqualEqual,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `&&`
    #[token("&&")]
    AmpAmp,
    /// `||`
    #[token("||")]
    PipePipe,
    /// `&`
    #[token("&")]
    Ampersand,
    /// `|`
    #[token("|")]
    Pipe,
    /// `++`
    #[token("++")]
    PlusPlus,
    /// `--`
    #[token("--")]
    MinusMinus,
    /// `+=`
    #[token("+=")]
    PlusAssign,
    /// `-=`
    #[token("-=")]
    MinusAssign,
    /// `*=`
    #[token("*=")]
    MulAssign,
    /// `/=`
    #[token("/=")]
    DivAssign,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `!`
    #[token("!")]
    Bang,
    /// `=`
    #[token("=")]
    Equals,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `:`
    #[token(":")]
    Colon,
    /// `.`
    #[token(".")]
    Dot,
    /// `?`
    #[token("?")]
    Question,
    /// Line breaks. Skipped, but they advance the line counter.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        lex.extras.line_start = lex.span().end;
        logos::Skip
    })]
    NewLine,
    /// Spaces, tabs, carriage returns and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
    /// End of input. Produced once by [`Lexer`], never by the scanner itself.
    Eof,
}

impl TokenKind {
    /// Returns `true` for reserved words.
    ///
    /// Reserved words may still be used as property names after `.` or as
    /// object literal keys; the parser uses this to accept them there.
    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        matches!(self,
                 Self::Bool(_)
                 | Self::Undefined
                 | Self::Null
                 | Self::Interface
                 | Self::Function
                 | Self::Let
                 | Self::Return
                 | Self::If
                 | Self::Else
                 | Self::Export
                 | Self::For
                 | Self::While
                 | Self::This)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Number(n) => return write!(f, "number {n}"),
            Self::Str(s) => return write!(f, "string \"{s}\""),
            Self::Identifier(name) => return write!(f, "identifier `{name}`"),
            Self::Bool(b) => return write!(f, "`{b}`"),
            Self::Eof => "end of input",
            Self::UnterminatedString => "unterminated string",
            Self::Undefined => "`undefined`",
            Self::Null => "`null`",
            Self::Interface => "`interface`",
            Self::Function => "`function`",
            Self::Let => "`let`",
            Self::Return => "`return`",
            Self::If => "`if`",
            Self::Else => "`else`",
            Self::Export => "`export`",
            Self::For => "`for`",
            Self::While => "`while`",
            Self::This => "`this`",
            Self::Arrow => "'=>'",
            Self::EqualEqualEqual => "'==='",
            Self::BangEqualEqual => "'!=='",
            Self::EqualEqual => "'=='",
            Self::BangEqual => "'!='",
            Self::LessEqual => "'<='",
            Self::GreaterEqual => "'>='",
            Self::Less => "'<'",
            Self::Greater => "'>'",
            Self::AmpAmp => "'&&'",
            Self::PipePipe => "'||'",
            Self::Ampersand => "'&'",
            Self::Pipe => "'|'",
            Self::PlusPlus => "'++'",
            Self::MinusMinus => "'--'",
            Self::PlusAssign => "'+='",
            Self::MinusAssign => "'-='",
            Self::MulAssign => "'*='",
            Self::DivAssign => "'/='",
            Self::Plus => "'+'",
            Self::Minus => "'-'",
            Self::Star => "'*'",
            Self::Slash => "'/'",
            Self::Percent => "'%'",
            Self::Bang => "'!'",
            Self::Equals => "'='",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::Comma => "','",
            Self::Semicolon => "';'",
            Self::Colon => "':'",
            Self::Dot => "'.'",
            Self::Question => "'?'",
            Self::Comment | Self::MultiLineComment => "comment",
            Self::NewLine | Self::Ignored => "whitespace",
        };
        f.write_str(text)
    }
}

/// A token together with its source text and position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What kind of token this is, including any literal payload.
    pub kind:     TokenKind,
    /// The exact source text the token was scanned from.
    pub lexeme:   String,
    /// Where the token starts.
    pub position: Position,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line and the byte offset where it starts, so that
/// every token can be given a line and column for diagnostics.
#[derive(Debug, Clone)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line:       usize,
    /// Byte offset of the first character of the current line.
    pub line_start: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line:       1,
               line_start: 0, }
    }
}

/// Lazy token stream over a source string.
///
/// The stream yields `Ok(Token)` for every token, followed by exactly one
/// [`TokenKind::Eof`] token, and then ends. The first lexical error is
/// yielded as `Err` and ends the stream. Call [`Lexer::restart`] (or clone
/// the lexer before consuming it) to scan the same source again.
///
/// # Example
/// ```
/// use tslite::interpreter::lexer::{Lexer, TokenKind};
///
/// let kinds = Lexer::new("let x = 1;").map(|t| t.unwrap().kind)
///                                     .collect::<Vec<_>>();
///
/// assert_eq!(kinds,
///            vec![TokenKind::Let,
///                 TokenKind::Identifier("x".into()),
///                 TokenKind::Equals,
///                 TokenKind::Number(1.0),
///                 TokenKind::Semicolon,
///                 TokenKind::Eof]);
/// ```
#[derive(Clone)]
pub struct Lexer<'src> {
    source:   &'src str,
    inner:    logos::Lexer<'src, TokenKind>,
    finished: bool,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer positioned at the start of `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self { source,
               inner: TokenKind::lexer_with_extras(source, LexerExtras::default()),
               finished: false }
    }

    /// Rewinds the lexer to the start of its source.
    pub fn restart(&mut self) {
        *self = Self::new(self.source);
    }

    /// Computes the position of a byte offset on the current line.
    fn position_of(&self, offset: usize) -> Position {
        let extras = &self.inner.extras;
        let column = self.source
                         .get(extras.line_start..offset)
                         .map_or(0, |prefix| prefix.chars().count());

        Position::new(extras.line, column + 1)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.inner.next() {
            Some(Ok(TokenKind::UnterminatedString)) => {
                self.finished = true;
                let position = self.position_of(self.inner.span().start);
                Some(Err(LexError::UnterminatedString { position }))
            },
            Some(Ok(kind)) => {
                let position = self.position_of(self.inner.span().start);
                Some(Ok(Token { kind,
                                lexeme: self.inner.slice().to_string(),
                                position }))
            },
            Some(Err(())) => {
                self.finished = true;
                let position = self.position_of(self.inner.span().start);
                Some(Err(LexError::UnexpectedCharacter { character: self.inner
                                                                        .slice()
                                                                        .to_string(),
                                                         position }))
            },
            None => {
                self.finished = true;
                let position = self.position_of(self.source.len());
                Some(Ok(Token { kind: TokenKind::Eof,
                                lexeme: String::new(),
                                position }))
            },
        }
    }
}

/// Scans a whole source string into a vector of tokens.
///
/// The returned vector always ends with a [`TokenKind::Eof`] token.
///
/// # Errors
/// Returns the first [`LexError`] encountered: an unterminated string or a
/// character that cannot start any token.
///
/// # Example
/// ```
/// use tslite::interpreter::lexer::tokenize;
///
/// assert_eq!(tokenize("a + 'b'").unwrap().len(), 4);
/// assert!(tokenize("let s = \"oops").is_err());
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).collect()
}

/// Parses a numeric literal from the current token slice.
///
/// # Parameters
/// - `lex`: Reference to the Logos lexer at the current token.
///
/// # Returns
/// - `Some(f64)`: The parsed value if successful.
/// - `None`: If the token slice is not a valid number.
fn parse_number(lex: &logos::Lexer<TokenKind>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Parses a boolean literal from the current token slice (`true` or `false`).
fn parse_bool(lex: &logos::Lexer<TokenKind>) -> Option<bool> {
    match lex.slice() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Decodes a quoted string literal, resolving escape sequences.
///
/// Recognized escapes are `\n`, `\t`, `\r`, `\0`, `\\`, `\'` and `\"`; any
/// other escaped character stands for itself.
fn parse_string(lex: &logos::Lexer<TokenKind>) -> Option<String> {
    let slice = lex.slice();
    let body = slice.get(1..slice.len() - 1)?;

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            other => out.push(other),
        }
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap()
                        .into_iter()
                        .map(|t| t.kind)
                        .collect()
    }

    #[test]
    fn keywords_and_identifiers_use_maximal_munch() {
        assert_eq!(kinds("let letter interface iface"),
                   vec![TokenKind::Let,
                        TokenKind::Identifier("letter".into()),
                        TokenKind::Interface,
                        TokenKind::Identifier("iface".into()),
                        TokenKind::Eof]);
    }

    #[test]
    fn string_literals_accept_both_quotes_and_escapes() {
        assert_eq!(kinds(r#"'it\'s' "a\"b" "x\ny""#),
                   vec![TokenKind::Str("it's".into()),
                        TokenKind::Str("a\"b".into()),
                        TokenKind::Str("x\ny".into()),
                        TokenKind::Eof]);
    }

    #[test]
    fn comments_are_skipped_and_lines_are_tracked() {
        let tokens = tokenize("// first\nlet /* a\n b */ x").unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Let);
        assert_eq!(tokens[0].position, Position::new(2, 1));
        assert_eq!(tokens[1].kind, TokenKind::Identifier("x".into()));
        assert_eq!(tokens[1].position, Position::new(3, 7));
    }

    #[test]
    fn operators_prefer_the_longest_match() {
        assert_eq!(kinds("a === b !== c => d++"),
                   vec![TokenKind::Identifier("a".into()),
                        TokenKind::EqualEqualEqual,
                        TokenKind::Identifier("b".into()),
                        TokenKind::BangEqualEqual,
                        TokenKind::Identifier("c".into()),
                        TokenKind::Arrow,
                        TokenKind::Identifier("d".into()),
                        TokenKind::PlusPlus,
                        TokenKind::Eof]);
    }

    #[test]
    fn unterminated_string_reports_its_start() {
        let err = tokenize("let s = 'abc\nlet t = 1").unwrap_err();

        assert_eq!(err, LexError::UnterminatedString { position: Position::new(1, 9) });
    }

    #[test]
    fn unexpected_character_is_an_error() {
        let err = tokenize("let a = #").unwrap_err();

        assert!(matches!(err, LexError::UnexpectedCharacter { ref character, .. } if character == "#"));
    }

    #[test]
    fn lexer_is_restartable() {
        let mut lexer = Lexer::new("a b");
        assert_eq!(lexer.by_ref().count(), 3);
        assert!(lexer.next().is_none());

        lexer.restart();
        assert_eq!(lexer.count(), 3);
    }
}
