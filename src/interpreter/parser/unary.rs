use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{Expr, LiteralValue, ObjectProperty, UnaryOperator, UpdateOperator},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            binary::ensure_assignable,
            core::{ParseResult, parse_expression},
            statement::parse_function,
            utils::{
                NestingGuard, expect, parse_comma_separated, parse_property_name, unexpected,
            },
        },
    },
    util::position::Position,
};

/// Parses a unary expression.
///
/// Supports prefix operators:
/// - `-`  (numeric negation)
/// - `!`  (logical not)
/// - `++` and `--` (prefix update)
///
/// Unary operators are right-associative, so an input like `!-x` is parsed as
/// `!( -x )`.
///
/// If no unary operator is present, the function delegates to
/// [`parse_primary`] and then applies any postfix operators via
/// [`parse_postfix`].
///
/// Grammar:
/// ```text
///     unary := ("-" | "!" | "++" | "--") unary
///            | primary postfix*
/// ```
/// # Parameters
/// - `tokens`: Token iterator with lookahead.
///
/// # Returns
/// An [`Expr::UnaryOp`], an [`Expr::Update`], or a primary expression possibly
/// followed by postfixes.
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let Some(token) = tokens.peek().copied() else {
        return Err(ParseError::UnexpectedEndOfInput { expected: "expression".to_string(),
                                                      position: Position::default(), });
    };
    let position = token.position;
    let mut nesting = NestingGuard::enter(position)?;

    let op = match token.kind {
        TokenKind::Minus => UnaryOperator::Negate,
        TokenKind::Bang => UnaryOperator::Not,
        TokenKind::PlusPlus | TokenKind::MinusMinus => {
            tokens.next();
            let target = parse_unary(tokens)?;
            ensure_assignable(&target)?;
            return Ok(Expr::Update { target: Box::new(target),
                                     op: update_operator(&token.kind),
                                     prefix: true,
                                     position });
        },
        _ => {
            let primary = parse_primary(tokens)?;
            return parse_postfix(tokens, primary, &mut nesting);
        },
    };

    tokens.next();
    let expr = parse_unary(tokens)?;
    Ok(Expr::UnaryOp { op,
                       expr: Box::new(expr),
                       position })
}

/// Applies postfix operators to an expression.
///
/// Postfix operators bind tighter than any prefix operator and may be
/// chained: `make().inner.run()` is a call on a member of a member of a call.
/// A postfix `++`/`--` ends the chain. Each call and member access wraps the
/// expression built so far and deepens `nesting` by one level.
///
/// Grammar:
/// ```text
///     postfix := "(" arguments ")"
///              | "." property_name
///              | "++" | "--"
/// ```
///
/// # Errors
/// Returns a `ParseError` if an argument list or property name is malformed,
/// or if `++`/`--` is applied to something that cannot be assigned to.
fn parse_postfix<'a, I>(tokens: &mut Peekable<I>,
                        mut expr: Expr,
                        nesting: &mut NestingGuard)
                        -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    while let Some(token) = tokens.peek().copied() {
        match token.kind {
            TokenKind::LParen => {
                nesting.deepen(token.position)?;
                tokens.next();
                let arguments = parse_comma_separated(tokens, parse_expression, &TokenKind::RParen)?;
                expr = Expr::Call { callee: Box::new(expr),
                                    arguments,
                                    position: token.position };
            },
            TokenKind::Dot => {
                nesting.deepen(token.position)?;
                tokens.next();
                let (property, position) = parse_property_name(tokens)?;
                expr = Expr::Member { object: Box::new(expr),
                                      property,
                                      position };
            },
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                tokens.next();
                ensure_assignable(&expr)?;
                return Ok(Expr::Update { target:   Box::new(expr),
                                         op:       update_operator(&token.kind),
                                         prefix:   false,
                                         position: token.position, });
            },
            _ => break,
        }
    }

    Ok(expr)
}

/// Parses a primary expression.
///
/// Primary expressions are the atoms of the grammar:
/// - number, string, boolean, `undefined` and `null` literals,
/// - identifiers and `this`,
/// - parenthesised expressions,
/// - object literals,
/// - function expressions.
///
/// # Errors
/// `UnexpectedToken` naming an expression as expected if the next token
/// cannot start one.
fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let Some(token) = tokens.peek().copied() else {
        return Err(ParseError::UnexpectedEndOfInput { expected: "expression".to_string(),
                                                      position: Position::default(), });
    };
    let position = token.position;

    let literal = |value: LiteralValue| Expr::Literal { value, position };
    let expr = match &token.kind {
        TokenKind::Number(n) => literal(LiteralValue::Number(*n)),
        TokenKind::Str(s) => literal(LiteralValue::Str(s.clone())),
        TokenKind::Bool(b) => literal(LiteralValue::Bool(*b)),
        TokenKind::Undefined | TokenKind::Null => literal(LiteralValue::Undefined),
        TokenKind::Identifier(name) => Expr::Variable { name: name.clone(),
                                                        position },
        TokenKind::This => Expr::This { position },
        TokenKind::LParen => {
            tokens.next();
            let inner = parse_expression(tokens)?;
            expect(tokens, &TokenKind::RParen, "')'")?;
            return Ok(inner);
        },
        TokenKind::LBrace => {
            tokens.next();
            let properties = parse_comma_separated(tokens, parse_object_property, &TokenKind::RBrace)?;
            return Ok(Expr::ObjectLiteral { properties,
                                            position });
        },
        TokenKind::Function => return Ok(Expr::Function(Rc::new(parse_function(tokens)?))),
        _ => return Err(unexpected(token, "expression")),
    };

    tokens.next();
    Ok(expr)
}

/// Parses one `name: value` entry of an object literal.
///
/// # Errors
/// Returns a `ParseError` if the name, the colon or the value is missing.
fn parse_object_property<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ObjectProperty>
    where I: Iterator<Item = &'a Token> + Clone
{
    let (name, position) = parse_property_name(tokens)?;
    expect(tokens, &TokenKind::Colon, "':' after property name")?;
    let value = parse_expression(tokens)?;

    Ok(ObjectProperty { name,
                        value,
                        position })
}

const fn update_operator(kind: &TokenKind) -> UpdateOperator {
    match kind {
        TokenKind::MinusMinus => UpdateOperator::Decrement,
        _ => UpdateOperator::Increment,
    }
}
