use std::iter::Peekable;

use crate::{
    ast::Block,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            core::ParseResult,
            statement::parse_statement,
            utils::{check, eat, expect, peek_position, unexpected},
        },
    },
};

/// Parses a block delimited by braces.
///
/// A block consists of zero or more statements. Stray semicolons between
/// statements are ignored. Parsing continues until the closing `}`.
///
/// Grammar: `block := "{" statement* "}"`
///
/// # Parameters
/// - `tokens`: Token stream positioned at the opening brace.
///
/// # Returns
/// The block with all parsed statements.
///
/// # Errors
/// `UnexpectedEndOfInput` if the input ends before the closing brace, or any
/// error from statement parsing.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Block>
    where I: Iterator<Item = &'a Token> + Clone
{
    let position = expect(tokens, &TokenKind::LBrace, "'{'")?.position;
    let mut statements = Vec::new();

    loop {
        if eat(tokens, &TokenKind::RBrace) {
            break;
        }
        if eat(tokens, &TokenKind::Semicolon) {
            continue;
        }
        if let Some(token) = tokens.peek()
           && token.kind == TokenKind::Eof
        {
            return Err(unexpected(token, "'}'"));
        }
        statements.push(parse_statement(tokens)?);
    }

    Ok(Block { statements,
               position })
}

/// Parses the body of an `if`, `else`, `for` or `while`.
///
/// Bodies are usually blocks, but a single statement is accepted as well and
/// wrapped in a block of its own so that it gets its own scope.
pub fn parse_body<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Block>
    where I: Iterator<Item = &'a Token> + Clone
{
    if check(tokens, &TokenKind::LBrace) {
        return parse_block(tokens);
    }

    let position = peek_position(tokens);
    let statement = parse_statement(tokens)?;
    Ok(Block { statements: vec![statement],
               position })
}
