use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{Expr, FunctionDef, InterfaceDecl, Statement},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            block::{parse_block, parse_body},
            core::{ParseResult, parse_expression, parse_if},
            types::{parse_type, parse_type_members},
            utils::{
                NestingGuard, check, eat, expect, parse_identifier, parse_parameter_list,
                peek_position, skip_semicolon, unexpected,
            },
        },
    },
};

/// Parses a single statement.
///
/// A statement may be one of:
/// - a variable declaration (`let`),
/// - a function declaration (`function name(...)`),
/// - `return`, `if`, `for` or `while`,
/// - a bare block,
/// - an expression used as a statement.
///
/// The kind is decided by the first token; anything that does not start a
/// keyword statement is parsed as an expression statement. A trailing
/// semicolon is consumed if present.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first token of the statement.
///
/// # Returns
/// A parsed [`Statement`] node.
///
/// # Errors
/// `NotAtTopLevel` for interface and export declarations, which only
/// [`parse_program`](super::core::parse_program) accepts, or any error from
/// the statement's parts.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let Some(token) = tokens.peek().copied() else {
        return Err(ParseError::UnexpectedEndOfInput { expected: "statement".to_string(),
                                                      position: Default::default(), });
    };
    let position = token.position;
    let _nesting = NestingGuard::enter(position)?;

    let statement = match &token.kind {
        TokenKind::Let => parse_variable_declaration(tokens)?,
        TokenKind::Function if is_function_declaration(tokens) => {
            Statement::Function(Rc::new(parse_function(tokens)?))
        },
        TokenKind::Return => parse_return(tokens)?,
        TokenKind::If => {
            tokens.next();
            return parse_if(tokens, position);
        },
        TokenKind::For => return parse_for(tokens),
        TokenKind::While => return parse_while(tokens),
        TokenKind::LBrace => return Ok(Statement::Block(parse_block(tokens)?)),
        TokenKind::Interface => {
            return Err(ParseError::NotAtTopLevel { construct: "interface declaration",
                                                   position });
        },
        TokenKind::Export => {
            return Err(ParseError::NotAtTopLevel { construct: "export declaration",
                                                   position });
        },
        _ => {
            let expr = parse_expression(tokens)?;
            Statement::Expression { expr,
                                    position }
        },
    };

    skip_semicolon(tokens);
    Ok(statement)
}

/// Returns `true` if a `function` keyword starts a named declaration rather
/// than a function expression.
fn is_function_declaration<'a, I>(tokens: &Peekable<I>) -> bool
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut lookahead = tokens.clone();
    lookahead.next();
    matches!(lookahead.peek().map(|token| &token.kind), Some(TokenKind::Identifier(_)))
}

/// Parses a variable declaration without its terminating semicolon.
///
/// Grammar: `let_decl := "let" identifier (":" type)? ("=" expression)?`
///
/// # Errors
/// Returns a `ParseError` if the name is missing or a part fails to parse.
fn parse_variable_declaration<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let position = expect(tokens, &TokenKind::Let, "'let'")?.position;
    let (name, _) = parse_identifier(tokens)?;
    let annotation = if eat(tokens, &TokenKind::Colon) {
        Some(parse_type(tokens)?)
    } else {
        None
    };
    let value = if eat(tokens, &TokenKind::Equals) {
        Some(parse_expression(tokens)?)
    } else {
        None
    };

    Ok(Statement::VariableDeclaration { name,
                                        annotation,
                                        value,
                                        position })
}

/// Parses a function, either a declaration or a function expression.
///
/// Grammar:
/// ```text
///     function := "function" identifier? params (":" type)? block
/// ```
///
/// # Parameters
/// - `tokens`: Token stream positioned at the `function` keyword.
///
/// # Returns
/// The function definition. Whether a name is required is up to the caller.
///
/// # Errors
/// Returns a `ParseError` if the parameter list, return type or body is
/// malformed.
pub fn parse_function<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<FunctionDef>
    where I: Iterator<Item = &'a Token> + Clone
{
    let position = expect(tokens, &TokenKind::Function, "'function'")?.position;
    let name = match tokens.peek() {
        Some(Token { kind: TokenKind::Identifier(name),
                     .. }) => {
            let name = name.clone();
            tokens.next();
            Some(name)
        },
        _ => None,
    };
    let params = parse_parameter_list(tokens)?;
    let return_type = if eat(tokens, &TokenKind::Colon) {
        Some(parse_type(tokens)?)
    } else {
        None
    };
    let body = parse_block(tokens)?;

    Ok(FunctionDef { name,
                     params,
                     return_type,
                     body,
                     position })
}

/// Parses `return [expression]`.
///
/// The value is omitted when the keyword is directly followed by `;`, `}` or
/// the end of input.
fn parse_return<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let position = expect(tokens, &TokenKind::Return, "'return'")?.position;
    let value = if check(tokens, &TokenKind::Semicolon)
                   || check(tokens, &TokenKind::RBrace)
                   || check(tokens, &TokenKind::Eof)
    {
        None
    } else {
        Some(parse_expression(tokens)?)
    };

    Ok(Statement::Return { value, position })
}

/// Parses a C-style `for` loop.
///
/// Grammar:
/// ```text
///     for := "for" "(" (let_decl | expression)? ";" expression? ";" expression? ")" body
/// ```
///
/// # Errors
/// Returns a `ParseError` if the header is malformed.
fn parse_for<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let position = expect(tokens, &TokenKind::For, "'for'")?.position;
    expect(tokens, &TokenKind::LParen, "'(' after 'for'")?;

    let init = if check(tokens, &TokenKind::Semicolon) {
        None
    } else if check(tokens, &TokenKind::Let) {
        Some(Box::new(parse_variable_declaration(tokens)?))
    } else {
        let expr_position = peek_position(tokens);
        let expr = parse_expression(tokens)?;
        Some(Box::new(Statement::Expression { expr,
                                              position: expr_position }))
    };
    expect(tokens, &TokenKind::Semicolon, "';' after loop initializer")?;

    let condition = optional_expression(tokens, &TokenKind::Semicolon)?;
    expect(tokens, &TokenKind::Semicolon, "';' after loop condition")?;

    let update = optional_expression(tokens, &TokenKind::RParen)?;
    expect(tokens, &TokenKind::RParen, "')' after loop header")?;

    let body = parse_body(tokens)?;

    Ok(Statement::For { init,
                        condition,
                        update,
                        body,
                        position })
}

/// Parses an expression unless the next token is `terminator`.
fn optional_expression<'a, I>(tokens: &mut Peekable<I>, terminator: &TokenKind) -> ParseResult<Option<Expr>>
    where I: Iterator<Item = &'a Token> + Clone
{
    if check(tokens, terminator) {
        return Ok(None);
    }
    parse_expression(tokens).map(Some)
}

/// Parses `while (condition) body`.
fn parse_while<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let position = expect(tokens, &TokenKind::While, "'while'")?.position;
    expect(tokens, &TokenKind::LParen, "'(' after 'while'")?;
    let condition = parse_expression(tokens)?;
    expect(tokens, &TokenKind::RParen, "')' after while condition")?;
    let body = parse_body(tokens)?;

    Ok(Statement::While { condition,
                          body,
                          position })
}

/// Parses an interface declaration.
///
/// Members are separated by `;` or `,`; a trailing separator is allowed.
/// Methods are written `name(params): Type` and stored as properties with a
/// function type.
///
/// Grammar: `interface := "interface" identifier "{" member* "}"`
///
/// # Errors
/// Returns a `ParseError` if the name or a member is malformed.
pub fn parse_interface<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<InterfaceDecl>
    where I: Iterator<Item = &'a Token> + Clone
{
    let position = expect(tokens, &TokenKind::Interface, "'interface'")?.position;
    let (name, _) = parse_identifier(tokens)?;
    match tokens.next() {
        Some(token) if token.kind == TokenKind::LBrace => {},
        Some(token) => return Err(unexpected(token, "'{' after interface name")),
        None => {
            return Err(ParseError::UnexpectedEndOfInput { expected: "'{'".to_string(),
                                                          position });
        },
    }
    let members = parse_type_members(tokens)?;

    Ok(InterfaceDecl { name,
                       members,
                       position })
}
