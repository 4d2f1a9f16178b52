use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            core::ParseResult,
            unary::parse_unary,
            utils::{NestingGuard, peek_position},
        },
    },
};

/// Parses an assignment or anything of higher precedence.
///
/// Assignment is right-associative, so `a = b = c` assigns `c` to `b` and
/// then to `a`. The left side must be a variable or a member access.
///
/// Grammar:
/// ```text
///     assignment := logical_or (("=" | "+=" | "-=" | "*=" | "/=") assignment)?
/// ```
///
/// # Errors
/// `InvalidAssignmentTarget` if the left side cannot be assigned to.
pub fn parse_assignment<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let _nesting = NestingGuard::enter(peek_position(tokens))?;
    let target = parse_logical_or(tokens)?;

    if let Some(token) = tokens.peek()
       && let Some(op) = token_to_assignment_operator(&token.kind)
    {
        let position = token.position;
        tokens.next();
        ensure_assignable(&target)?;
        let value = parse_assignment(tokens)?;
        return Ok(Expr::Assignment { target: Box::new(target),
                                     op,
                                     value: Box::new(value),
                                     position });
    }

    Ok(target)
}

/// Checks that an expression may appear on the left of an assignment or as
/// the operand of `++`/`--`.
///
/// # Errors
/// `InvalidAssignmentTarget` unless the expression is a variable or a member
/// access.
pub(in crate::interpreter::parser) fn ensure_assignable(target: &Expr) -> ParseResult<()> {
    match target {
        Expr::Variable { .. } | Expr::Member { .. } => Ok(()),
        other => Err(ParseError::InvalidAssignmentTarget { position: other.position() }),
    }
}

/// Parses logical OR expressions.
///
/// The rule is: `logical_or := logical_and ("||" logical_and)*`
pub fn parse_logical_or<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_associative(tokens, |op| op == BinaryOperator::Or, parse_logical_and)
}

/// Parses logical AND expressions.
///
/// The rule is: `logical_and := equality ("&&" equality)*`
pub fn parse_logical_and<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_associative(tokens, |op| op == BinaryOperator::And, parse_equality)
}

/// Parses equality comparisons.
///
/// The rule is: `equality := relational (("==" | "!=" | "===" | "!==") relational)*`
pub fn parse_equality<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_associative(tokens, BinaryOperator::is_equality, parse_relational)
}

/// Parses ordering comparisons.
///
/// The rule is: `relational := additive (("<" | ">" | "<=" | ">=") additive)*`
pub fn parse_relational<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_associative(tokens, BinaryOperator::is_relational, parse_additive)
}

/// Parses addition and subtraction expressions.
///
/// Handles left-associative binary operators: `+` and `-`.
///
/// The rule is: `additive := multiplicative (("+" | "-") multiplicative)*`
///
/// # Parameters
/// - `tokens`: Token stream.
///
/// # Returns
/// An `Expr::BinaryOp` tree representing the parsed expression.
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_associative(tokens,
                           |op| matches!(op, BinaryOperator::Add | BinaryOperator::Sub),
                           parse_multiplicative)
}

/// Parses multiplication-level expressions.
///
/// Handles left-associative operators: `*`, `/` and `%`.
///
/// The rule is: `multiplicative := unary (("*" | "/" | "%") unary)*`
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_left_associative(tokens,
                           |op| matches!(op, BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod),
                           parse_unary)
}

/// Parses one left-associative precedence level.
///
/// # Parameters
/// - `tokens`: Token stream.
/// - `accepts`: Selects the operators that belong to this level.
/// - `operand`: Parser for the next-higher precedence level.
///
/// # Returns
/// The operands folded from the left into `Expr::BinaryOp` nodes.
fn parse_left_associative<'a, I>(tokens: &mut Peekable<I>,
                                 accepts: impl Fn(BinaryOperator) -> bool,
                                 operand: impl Fn(&mut Peekable<I>) -> ParseResult<Expr>)
                                 -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut nesting = NestingGuard::empty();
    let mut left = operand(tokens)?;
    loop {
        if let Some(token) = tokens.peek()
           && let Some(op) = token_to_binary_operator(&token.kind)
           && accepts(op)
        {
            let position = token.position;
            nesting.deepen(position)?;
            tokens.next();
            let right = operand(tokens)?;
            left = Expr::BinaryOp { left: Box::new(left),
                                    op,
                                    right: Box::new(right),
                                    position };
            continue;
        }
        break;
    }
    Ok(left)
}

/// Maps a token kind to its corresponding binary operator, if any.
///
/// # Returns
/// - `Some(BinaryOperator)` if the token represents a binary operator.
/// - `None` otherwise.
pub const fn token_to_binary_operator(kind: &TokenKind) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Plus => Some(BinaryOperator::Add),
        TokenKind::Minus => Some(BinaryOperator::Sub),
        TokenKind::Star => Some(BinaryOperator::Mul),
        TokenKind::Slash => Some(BinaryOperator::Div),
        TokenKind::Percent => Some(BinaryOperator::Mod),
        TokenKind::Less => Some(BinaryOperator::Less),
        TokenKind::Greater => Some(BinaryOperator::Greater),
        TokenKind::LessEqual => Some(BinaryOperator::LessEqual),
        TokenKind::GreaterEqual => Some(BinaryOperator::GreaterEqual),
        TokenKind::EqualEqual => Some(BinaryOperator::Equal),
        TokenKind::BangEqual => Some(BinaryOperator::NotEqual),
        TokenKind::EqualEqualEqual => Some(BinaryOperator::StrictEqual),
        TokenKind::BangEqualEqual => Some(BinaryOperator::StrictNotEqual),
        TokenKind::AmpAmp => Some(BinaryOperator::And),
        TokenKind::PipePipe => Some(BinaryOperator::Or),
        _ => None,
    }
}

/// Maps an assignment token to the arithmetic operator it applies.
///
/// # Returns
/// - `Some(None)` for plain `=`.
/// - `Some(Some(op))` for compound assignments such as `+=`.
/// - `None` if the token is not an assignment.
const fn token_to_assignment_operator(kind: &TokenKind) -> Option<Option<BinaryOperator>> {
    match kind {
        TokenKind::Equals => Some(None),
        TokenKind::PlusAssign => Some(Some(BinaryOperator::Add)),
        TokenKind::MinusAssign => Some(Some(BinaryOperator::Sub)),
        TokenKind::MulAssign => Some(Some(BinaryOperator::Mul)),
        TokenKind::DivAssign => Some(Some(BinaryOperator::Div)),
        _ => None,
    }
}
