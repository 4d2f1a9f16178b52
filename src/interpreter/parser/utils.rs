use std::{cell::Cell, iter::Peekable};

use crate::{
    ast::Parameter,
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{core::ParseResult, types::parse_type},
    },
    util::position::Position,
};

/// Returns `true` if the next token is of the given kind.
///
/// Only meaningful for kinds without a payload; literal kinds compare their
/// payload as well.
pub(in crate::interpreter::parser) fn check<'a, I>(tokens: &mut Peekable<I>, kind: &TokenKind) -> bool
    where I: Iterator<Item = &'a Token>
{
    tokens.peek().is_some_and(|token| token.kind == *kind)
}

/// Consumes the next token if it is of the given kind.
///
/// # Returns
/// `true` if a token was consumed.
pub(in crate::interpreter::parser) fn eat<'a, I>(tokens: &mut Peekable<I>, kind: &TokenKind) -> bool
    where I: Iterator<Item = &'a Token>
{
    if check(tokens, kind) {
        tokens.next();
        return true;
    }
    false
}

/// Consumes the next token, which must be of the given kind.
///
/// # Parameters
/// - `tokens`: Token iterator.
/// - `kind`: The required token kind.
/// - `expected`: Description of the expected construct, used in the error.
///
/// # Returns
/// The consumed token.
///
/// # Errors
/// `UnexpectedToken`, or `UnexpectedEndOfInput` if the input ended.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    kind: &TokenKind,
                                                    expected: &str)
                                                    -> ParseResult<&'a Token>
    where I: Iterator<Item = &'a Token>
{
    match tokens.next() {
        Some(token) if token.kind == *kind => Ok(token),
        Some(token) => Err(unexpected(token, expected)),
        None => Err(ParseError::UnexpectedEndOfInput { expected: expected.to_string(),
                                                       position: Position::default(), }),
    }
}

/// Builds the error for a token that does not fit the current construct.
///
/// The end-of-input token produces `UnexpectedEndOfInput`; any other token
/// produces `UnexpectedToken`.
pub(in crate::interpreter::parser) fn unexpected(token: &Token, expected: &str) -> ParseError {
    if token.kind == TokenKind::Eof {
        return ParseError::UnexpectedEndOfInput { expected: expected.to_string(),
                                                  position: token.position, };
    }
    ParseError::UnexpectedToken { expected: expected.to_string(),
                                  found:    token.kind.to_string(),
                                  position: token.position, }
}

/// The deepest nesting of expressions, statements and type annotations the
/// parser accepts.
pub const MAX_NESTING_DEPTH: usize = 256;

thread_local! {
    static NESTING_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Counts levels of nesting for as long as it is alive.
///
/// Every recursive entry point of the parser holds one of these, and loops
/// that build left-leaning trees deepen it once per node. Deeply nested input
/// therefore fails with `TooDeeplyNested` instead of exhausting the stack,
/// and the trees the parser builds stay shallow enough for the checker and
/// the evaluator to walk recursively.
pub(in crate::interpreter::parser) struct NestingGuard {
    levels: usize,
}

impl NestingGuard {
    /// Creates a guard that holds no levels yet.
    pub(in crate::interpreter::parser) const fn empty() -> Self {
        Self { levels: 0 }
    }

    /// Enters one level of nesting.
    ///
    /// # Errors
    /// `TooDeeplyNested` if the level would exceed [`MAX_NESTING_DEPTH`].
    pub(in crate::interpreter::parser) fn enter(position: Position) -> ParseResult<Self> {
        let mut guard = Self::empty();
        guard.deepen(position)?;
        Ok(guard)
    }

    /// Adds one more level to this guard.
    ///
    /// # Errors
    /// `TooDeeplyNested` if the level would exceed [`MAX_NESTING_DEPTH`].
    pub(in crate::interpreter::parser) fn deepen(&mut self, position: Position) -> ParseResult<()> {
        let depth = NESTING_DEPTH.get();
        if depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::TooDeeplyNested { limit: MAX_NESTING_DEPTH,
                                                     position });
        }
        NESTING_DEPTH.set(depth + 1);
        self.levels += 1;
        Ok(())
    }
}

impl Drop for NestingGuard {
    fn drop(&mut self) {
        NESTING_DEPTH.set(NESTING_DEPTH.get().saturating_sub(self.levels));
    }
}

/// Returns the position of the next token without consuming it.
pub(in crate::interpreter::parser) fn peek_position<'a, I>(tokens: &mut Peekable<I>) -> Position
    where I: Iterator<Item = &'a Token>
{
    tokens.peek().map_or_else(Position::default, |token| token.position)
}

/// Consumes an optional statement terminator.
///
/// Semicolons are optional in the language, so a missing one is never an
/// error.
pub(in crate::interpreter::parser) fn skip_semicolon<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a Token>
{
    eat(tokens, &TokenKind::Semicolon);
}

/// Parses a comma-separated list of items until a closing token.
///
/// This utility is shared by argument lists, parameter lists, and object
/// literals. It repeatedly calls `parse_item` to parse one element, expecting
/// either:
///
/// - a comma, to continue the list, or
/// - the specified closing token, to end it.
///
/// An immediately encountered closing token produces an empty list, and a
/// trailing comma before the closing token is accepted.
///
/// Grammar (simplified): `list := (item ("," item)* ","?)?`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token that terminates the list (e.g., `)` or `}`).
///
/// # Returns
/// A vector of parsed items.
///
/// # Errors
/// Returns a `ParseError` if:
/// - an item fails to parse,
/// - an unexpected token is encountered,
/// - the stream ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &TokenKind)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut items = Vec::new();
    loop {
        if eat(tokens, closing) {
            break;
        }
        items.push(parse_item(tokens)?);
        match tokens.next() {
            Some(token) if token.kind == TokenKind::Comma => {},
            Some(token) if token.kind == *closing => break,
            Some(token) => return Err(unexpected(token, &format!("',' or {closing}"))),
            None => {
                return Err(ParseError::UnexpectedEndOfInput { expected: closing.to_string(),
                                                              position: Position::default(), });
            },
        }
    }
    Ok(items)
}

/// Parses a plain identifier and returns its name and position.
///
/// The next token must be `TokenKind::Identifier`; reserved words are
/// rejected.
///
/// # Errors
/// Returns a `ParseError` if the next token is not an identifier.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>)
                                                              -> ParseResult<(String, Position)>
    where I: Iterator<Item = &'a Token>
{
    match tokens.next() {
        Some(Token { kind: TokenKind::Identifier(name),
                     position,
                     .. }) => Ok((name.clone(), *position)),
        Some(token) => Err(unexpected(token, "identifier")),
        None => Err(ParseError::UnexpectedEndOfInput { expected: "identifier".to_string(),
                                                       position: Position::default(), }),
    }
}

/// Parses a property name.
///
/// Property names are more permissive than variable names: reserved words
/// (`obj.if`, `{ return: 1 }`) and string literals (`{ "a b": 1 }`) are
/// accepted as well.
///
/// # Errors
/// Returns a `ParseError` if the next token cannot name a property.
pub(in crate::interpreter::parser) fn parse_property_name<'a, I>(tokens: &mut Peekable<I>)
                                                                 -> ParseResult<(String, Position)>
    where I: Iterator<Item = &'a Token>
{
    match tokens.next() {
        Some(Token { kind: TokenKind::Identifier(name) | TokenKind::Str(name),
                     position,
                     .. }) => Ok((name.clone(), *position)),
        Some(token) if token.kind.is_keyword() => Ok((token.lexeme.clone(), token.position)),
        Some(token) => Err(unexpected(token, "property name")),
        None => Err(ParseError::UnexpectedEndOfInput { expected: "property name".to_string(),
                                                       position: Position::default(), }),
    }
}

/// Parses a parenthesised parameter list, including the parentheses.
///
/// Each parameter is `name`, optionally followed by `?` and a `: Type`
/// annotation.
///
/// Grammar: `params := "(" (param ("," param)* ","?)? ")"`
///
/// # Errors
/// Returns a `ParseError` if the list is malformed.
pub(in crate::interpreter::parser) fn parse_parameter_list<'a, I>(tokens: &mut Peekable<I>)
                                                                  -> ParseResult<Vec<Parameter>>
    where I: Iterator<Item = &'a Token> + Clone
{
    expect(tokens, &TokenKind::LParen, "'('")?;
    parse_comma_separated(tokens, parse_parameter, &TokenKind::RParen)
}

/// Parses one parameter: `name[?][: Type]`.
fn parse_parameter<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Parameter>
    where I: Iterator<Item = &'a Token> + Clone
{
    let (name, position) = parse_identifier(tokens)?;
    let optional = eat(tokens, &TokenKind::Question);
    let annotation = if eat(tokens, &TokenKind::Colon) {
        Some(parse_type(tokens)?)
    } else {
        None
    };

    Ok(Parameter { name,
                   annotation,
                   optional,
                   position })
}
