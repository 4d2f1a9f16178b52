use std::iter::Peekable;

use crate::{
    ast::{Parameter, PropertySignature, TypeAnnotation},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            core::ParseResult,
            utils::{
                NestingGuard, check, eat, expect, parse_parameter_list, parse_property_name,
                peek_position, unexpected,
            },
        },
    },
    util::position::Position,
};

/// Parses a type annotation.
///
/// `&` binds tighter than `|`, so `string | number & Baz` is a union of
/// `string` and the intersection `number & Baz`. Chains of the same operator
/// are flattened into a single node with all members.
///
/// Grammar:
/// ```text
///     type         := intersection ("|" intersection)*
///     intersection := primary_type ("&" primary_type)*
///     primary_type := identifier | "undefined" | "null"
///                   | "{" member* "}"
///                   | "(" params ")" "=>" type
///                   | "(" type ")"
/// ```
///
/// # Errors
/// Returns a `ParseError` if the annotation is malformed.
pub fn parse_type<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<TypeAnnotation>
    where I: Iterator<Item = &'a Token> + Clone
{
    let position = peek_position(tokens);
    let _nesting = NestingGuard::enter(position)?;
    let mut members = vec![parse_intersection(tokens)?];
    while eat(tokens, &TokenKind::Pipe) {
        members.push(parse_intersection(tokens)?);
    }

    Ok(flatten(members, position, |members, position| TypeAnnotation::Union { members,
                                                                              position }))
}

fn parse_intersection<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<TypeAnnotation>
    where I: Iterator<Item = &'a Token> + Clone
{
    let position = peek_position(tokens);
    let mut members = vec![parse_primary_type(tokens)?];
    while eat(tokens, &TokenKind::Ampersand) {
        members.push(parse_primary_type(tokens)?);
    }

    Ok(flatten(members, position, |members, position| {
           TypeAnnotation::Intersection { members,
                                          position }
       }))
}

/// Collapses a one-member list into that member, otherwise builds the n-ary
/// node.
fn flatten(mut members: Vec<TypeAnnotation>,
           position: Position,
           build: impl FnOnce(Vec<TypeAnnotation>, Position) -> TypeAnnotation)
           -> TypeAnnotation {
    if members.len() == 1
       && let Some(only) = members.pop()
    {
        return only;
    }
    build(members, position)
}

fn parse_primary_type<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<TypeAnnotation>
    where I: Iterator<Item = &'a Token> + Clone
{
    let Some(token) = tokens.peek().copied() else {
        return Err(ParseError::UnexpectedEndOfInput { expected: "type".to_string(),
                                                      position: Position::default(), });
    };
    let position = token.position;

    match &token.kind {
        TokenKind::Identifier(name) => {
            tokens.next();
            Ok(TypeAnnotation::Named { name: name.clone(),
                                       position })
        },
        TokenKind::Undefined | TokenKind::Null => {
            tokens.next();
            Ok(TypeAnnotation::Named { name: token.lexeme.clone(),
                                       position })
        },
        TokenKind::LBrace => {
            tokens.next();
            let members = parse_type_members(tokens)?;
            Ok(TypeAnnotation::Object { members,
                                        position })
        },
        TokenKind::LParen if is_function_type(tokens) => parse_function_type(tokens),
        TokenKind::LParen => {
            tokens.next();
            let inner = parse_type(tokens)?;
            expect(tokens, &TokenKind::RParen, "')'")?;
            Ok(inner)
        },
        _ => Err(unexpected(token, "type")),
    }
}

/// Decides whether a `(` starts a function type or a parenthesised type.
///
/// Scans a clone of the stream to the matching `)` and checks whether `=>`
/// follows it. The real stream is not advanced.
fn is_function_type<'a, I>(tokens: &Peekable<I>) -> bool
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut lookahead = tokens.clone();
    let mut depth = 0usize;

    for token in lookahead.by_ref() {
        match token.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    break;
                }
            },
            TokenKind::Eof => return false,
            _ => {},
        }
    }

    matches!(lookahead.peek().map(|token| &token.kind), Some(TokenKind::Arrow))
}

/// Parses `(params) => Type`.
fn parse_function_type<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<TypeAnnotation>
    where I: Iterator<Item = &'a Token> + Clone
{
    let position = peek_position(tokens);
    let params = parse_parameter_list(tokens)?;
    expect(tokens, &TokenKind::Arrow, "'=>' in function type")?;
    let return_type = parse_type(tokens)?;

    Ok(TypeAnnotation::Function { params,
                                  return_type: Box::new(return_type),
                                  position })
}

/// Parses the members of an interface or object type, up to and including
/// the closing `}`.
///
/// Each member is a property `name[?]: Type` or a method
/// `name[?](params)[: Type]`. Members are separated by `;` or `,`; a trailing
/// separator is allowed. A method without a return annotation returns `any`.
///
/// # Errors
/// Returns a `ParseError` if a member is malformed or the closing brace is
/// missing.
pub fn parse_type_members<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<PropertySignature>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut members = Vec::new();

    loop {
        if eat(tokens, &TokenKind::RBrace) {
            break;
        }
        members.push(parse_member(tokens)?);
        if !eat(tokens, &TokenKind::Semicolon) {
            eat(tokens, &TokenKind::Comma);
        }
    }

    Ok(members)
}

fn parse_member<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<PropertySignature>
    where I: Iterator<Item = &'a Token> + Clone
{
    let (name, position) = parse_property_name(tokens)?;
    let optional = eat(tokens, &TokenKind::Question);

    let annotation = if check(tokens, &TokenKind::LParen) {
        let params_position = peek_position(tokens);
        let params: Vec<Parameter> = parse_parameter_list(tokens)?;
        let return_type = if eat(tokens, &TokenKind::Colon) {
            parse_type(tokens)?
        } else {
            TypeAnnotation::Named { name: "any".to_string(),
                                    position }
        };
        TypeAnnotation::Function { params,
                                   return_type: Box::new(return_type),
                                   position: params_position }
    } else {
        expect(tokens, &TokenKind::Colon, "':' after property name")?;
        parse_type(tokens)?
    };

    Ok(PropertySignature { name,
                           annotation,
                           optional,
                           position })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::lexer::tokenize;

    fn parse(source: &str) -> ParseResult<TypeAnnotation> {
        let tokens = tokenize(source).unwrap();
        let mut iter = tokens.iter().peekable();
        parse_type(&mut iter)
    }

    fn name(annotation: &TypeAnnotation) -> &str {
        match annotation {
            TypeAnnotation::Named { name, .. } => name,
            other => panic!("expected a named type, got {other:?}"),
        }
    }

    #[test]
    fn intersection_binds_tighter_than_union() {
        let TypeAnnotation::Union { members, .. } = parse("string | number & Baz").unwrap() else {
            panic!("expected union");
        };

        assert_eq!(name(&members[0]), "string");
        let TypeAnnotation::Intersection { members, .. } = &members[1] else {
            panic!("expected intersection");
        };
        assert_eq!(name(&members[0]), "number");
        assert_eq!(name(&members[1]), "Baz");
    }

    #[test]
    fn chains_are_flattened() {
        let TypeAnnotation::Union { members, .. } = parse("A | B | C").unwrap() else {
            panic!("expected union");
        };
        assert_eq!(members.len(), 3);
    }

    #[test]
    fn parenthesised_type_is_not_a_function() {
        let TypeAnnotation::Intersection { members, .. } = parse("(A | B) & C").unwrap() else {
            panic!("expected intersection");
        };
        assert!(matches!(members[0], TypeAnnotation::Union { .. }));
    }

    #[test]
    fn function_type_returning_function() {
        let TypeAnnotation::Function { params, return_type, .. } = parse("(f: (n: number) => void) => () => string").unwrap()
        else {
            panic!("expected function type");
        };

        assert_eq!(params.len(), 1);
        assert!(matches!(params[0].annotation, Some(TypeAnnotation::Function { .. })));
        assert!(matches!(*return_type, TypeAnnotation::Function { ref params, .. } if params.is_empty()));
    }

    #[test]
    fn object_type_members() {
        let TypeAnnotation::Object { members, .. } = parse("{ a: string, b?: number; greet(name: string): void }").unwrap()
        else {
            panic!("expected object type");
        };

        assert_eq!(members.len(), 3);
        assert!(members[1].optional);
        assert!(matches!(members[2].annotation, TypeAnnotation::Function { .. }));
    }

    #[test]
    fn missing_type() {
        assert!(matches!(parse(";"), Err(ParseError::UnexpectedToken { .. })));
    }
}
