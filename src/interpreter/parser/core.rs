use std::iter::Peekable;

use tracing::debug;

use crate::{
    ast::{Expr, Program, Statement},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            binary::parse_assignment,
            block::parse_body,
            statement::{parse_interface, parse_statement},
            utils::{
                NestingGuard, eat, expect, parse_comma_separated, parse_identifier,
                skip_semicolon,
            },
        },
    },
    util::position::Position,
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a complete token sequence into a [`Program`].
///
/// This is the entry point of the parser. The token slice must end with a
/// [`TokenKind::Eof`] token, as produced by
/// [`tokenize`](crate::interpreter::lexer::tokenize). Interface declarations
/// and `export { ... }` are only accepted here, at the top level; the latter is
/// parsed and dropped.
///
/// Grammar: `program := (interface | export | statement)* EOF`
///
/// # Parameters
/// - `tokens`: The tokens of the whole source text.
///
/// # Returns
/// The parsed program.
///
/// # Errors
/// The first [`ParseError`] encountered.
///
/// # Example
/// ```
/// use tslite::interpreter::{lexer::tokenize, parser::core::parse_program};
///
/// let tokens = tokenize("let x: number = 1; x = x + 1;").unwrap();
/// let program = parse_program(&tokens).unwrap();
///
/// assert_eq!(program.statements.len(), 2);
/// ```
pub fn parse_program(tokens: &[Token]) -> ParseResult<Program> {
    let mut tokens = tokens.iter().peekable();
    let mut statements = Vec::new();

    loop {
        match tokens.peek().map(|token| &token.kind) {
            None | Some(TokenKind::Eof) => break,
            Some(TokenKind::Semicolon) => {
                tokens.next();
            },
            Some(TokenKind::Interface) => {
                statements.push(Statement::Interface(parse_interface(&mut tokens)?));
            },
            Some(TokenKind::Export) => parse_export(&mut tokens)?,
            Some(_) => statements.push(parse_statement(&mut tokens)?),
        }
    }

    debug!(statements = statements.len(), "parsed program");
    Ok(Program { statements })
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing.
/// It begins at the lowest-precedence level, assignment, and recursively
/// descends through the precedence hierarchy.
///
/// Grammar: `expression := assignment`
///
/// # Parameters
/// - `tokens`: Token iterator.
///
/// # Returns
/// The parsed expression node.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_assignment(tokens)
}

/// Parses an `if` statement with optional `else` and chained `else if`.
///
/// Syntax:
/// ```text
///     if (<condition>) <body>
///     else if (<condition>) <body>
///     else <body>
/// ```
/// Nested `else if` constructs are parsed recursively into the
/// `else_branch` of the enclosing `if`.
///
/// # Parameters
/// - `tokens`: Token stream positioned after the `if` keyword.
/// - `position`: Position of the `if` token.
///
/// # Returns
/// A `Statement::If` node representing the full conditional.
///
/// # Errors
/// - `UnexpectedToken` if the parentheses around the condition are missing.
/// - Propagates any errors from sub-expression parsing.
pub fn parse_if<'a, I>(tokens: &mut Peekable<I>, position: Position) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token> + Clone
{
    let _nesting = NestingGuard::enter(position)?;
    expect(tokens, &TokenKind::LParen, "'(' after 'if'")?;
    let condition = parse_expression(tokens)?;
    expect(tokens, &TokenKind::RParen, "')' after if condition")?;

    let then_branch = parse_body(tokens)?;

    let else_branch = if eat(tokens, &TokenKind::Else) {
        if let Some(token) = tokens.peek()
           && token.kind == TokenKind::If
        {
            let if_position = token.position;
            tokens.next();
            Some(Box::new(parse_if(tokens, if_position)?))
        } else {
            Some(Box::new(Statement::Block(parse_body(tokens)?)))
        }
    } else {
        None
    };

    Ok(Statement::If { condition,
                       then_branch,
                       else_branch,
                       position })
}

/// Parses `export { name, ... };`.
///
/// Exports have no meaning for a single-file program, so the names are
/// checked for well-formedness and then dropped.
fn parse_export<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<()>
    where I: Iterator<Item = &'a Token> + Clone
{
    expect(tokens, &TokenKind::Export, "'export'")?;
    expect(tokens, &TokenKind::LBrace, "'{' after 'export'")?;
    parse_comma_separated(tokens, parse_identifier, &TokenKind::RBrace)?;
    skip_semicolon(tokens);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{BinaryOperator, LiteralValue, TypeAnnotation},
        interpreter::{lexer::tokenize, parser::utils::MAX_NESTING_DEPTH},
    };

    fn parse(source: &str) -> ParseResult<Program> {
        parse_program(&tokenize(source).unwrap())
    }

    #[test]
    fn parses_declarations_and_drops_export() {
        let program = parse("interface Foo { name: string }\n\
                             function greet(f: Foo): string { return f.name; }\n\
                             let x = greet({ name: 'hi' });\n\
                             export {};")
        .unwrap();

        assert_eq!(program.statements.len(), 3);
        assert!(matches!(program.statements[0], Statement::Interface(_)));
        assert!(matches!(program.statements[1], Statement::Function(_)));
        assert!(matches!(program.statements[2], Statement::VariableDeclaration { .. }));
    }

    #[test]
    fn precedence_of_arithmetic_and_comparison() {
        let program = parse("i % 3 == 0 && i < n + 1;").unwrap();
        let Statement::Expression { expr, .. } = &program.statements[0] else {
            panic!("expected expression statement");
        };
        let Expr::BinaryOp { op, left, right, .. } = expr else {
            panic!("expected binary op");
        };

        assert_eq!(*op, BinaryOperator::And);
        assert!(matches!(**left, Expr::BinaryOp { op: BinaryOperator::Equal, .. }));
        assert!(matches!(**right, Expr::BinaryOp { op: BinaryOperator::Less, .. }));
    }

    #[test]
    fn assignment_is_right_associative() {
        let program = parse("a = b = 1").unwrap();
        let Statement::Expression { expr: Expr::Assignment { value, .. },
                                    .. } = &program.statements[0]
        else {
            panic!("expected assignment");
        };

        assert!(matches!(**value, Expr::Assignment { .. }));
    }

    #[test]
    fn invalid_assignment_target() {
        let err = parse("1 = 2;").unwrap_err();
        assert!(matches!(err, ParseError::InvalidAssignmentTarget { .. }));

        let err = parse("f() = 2;").unwrap_err();
        assert!(matches!(err, ParseError::InvalidAssignmentTarget { .. }));
    }

    #[test]
    fn else_if_chains_nest() {
        let program = parse("if (a) { } else if (b) { } else { x; }").unwrap();
        let Statement::If { else_branch: Some(inner), .. } = &program.statements[0] else {
            panic!("expected if");
        };
        let Statement::If { else_branch: Some(last), .. } = &**inner else {
            panic!("expected else if");
        };

        assert!(matches!(**last, Statement::Block(_)));
    }

    #[test]
    fn union_and_intersection_annotations() {
        let program = parse("let q: string | (number & Baz) | Foo;").unwrap();
        let Statement::VariableDeclaration { annotation: Some(TypeAnnotation::Union { members, .. }),
                                             value: None,
                                             .. } = &program.statements[0]
        else {
            panic!("expected union annotation");
        };

        assert_eq!(members.len(), 3);
        assert!(matches!(members[1], TypeAnnotation::Intersection { ref members, .. } if members.len() == 2));
    }

    #[test]
    fn function_type_annotation() {
        let program = parse("let f: (a: number, b?: string) => void;").unwrap();
        let Statement::VariableDeclaration { annotation: Some(TypeAnnotation::Function { params, .. }),
                                             .. } = &program.statements[0]
        else {
            panic!("expected function type");
        };

        assert_eq!(params.len(), 2);
        assert!(params[1].optional);
    }

    #[test]
    fn call_chains_and_members() {
        let program = parse("returnsFn()(); obj.qux.foo();").unwrap();
        let Statement::Expression { expr: Expr::Call { callee, .. },
                                    .. } = &program.statements[0]
        else {
            panic!("expected call");
        };
        assert!(matches!(**callee, Expr::Call { .. }));

        let Statement::Expression { expr: Expr::Call { callee, .. },
                                    .. } = &program.statements[1]
        else {
            panic!("expected call");
        };
        assert!(matches!(**callee, Expr::Member { ref property, .. } if property == "foo"));
    }

    #[test]
    fn object_literal_with_trailing_comma_and_methods() {
        let program = parse("let o = { a: 'a', if: 1, get: function (): string { return this.a; }, };")
            .unwrap();
        let Statement::VariableDeclaration { value: Some(Expr::ObjectLiteral { properties, .. }),
                                             .. } = &program.statements[0]
        else {
            panic!("expected object literal");
        };

        assert_eq!(properties.len(), 3);
        assert_eq!(properties[1].name, "if");
        assert!(matches!(properties[2].value, Expr::Function(_)));
    }

    #[test]
    fn for_loop_with_update() {
        let program = parse("for (let i = 1; i < 10; i++) { x += i; }").unwrap();
        let Statement::For { init: Some(init),
                             condition: Some(_),
                             update: Some(Expr::Update { prefix: false, .. }),
                             body,
                             .. } = &program.statements[0]
        else {
            panic!("expected for loop");
        };

        assert!(matches!(**init, Statement::VariableDeclaration { .. }));
        assert_eq!(body.statements.len(), 1);
    }

    #[test]
    fn interface_only_at_top_level() {
        let err = parse("function f() { interface A { } }").unwrap_err();
        assert!(matches!(err, ParseError::NotAtTopLevel { .. }));
    }

    #[test]
    fn reports_position_of_offending_token() {
        let err = parse("let x = ;").unwrap_err();
        assert_eq!(err,
                   ParseError::UnexpectedToken { expected: "expression".to_string(),
                                                 found:    "';'".to_string(),
                                                 position: Position::new(1, 9), });
    }

    #[test]
    fn unclosed_block_is_end_of_input() {
        let err = parse("function f() { return 1;").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEndOfInput { .. }));
    }

    #[test]
    fn literals() {
        let program = parse("'s'; 2.5; true; undefined; null;").unwrap();
        let values = program.statements
                            .iter()
                            .map(|s| match s {
                                Statement::Expression { expr: Expr::Literal { value, .. },
                                                        .. } => value.clone(),
                                other => panic!("unexpected {other:?}"),
                            })
                            .collect::<Vec<_>>();

        assert_eq!(values,
                   vec![LiteralValue::from("s"),
                        LiteralValue::Number(2.5),
                        LiteralValue::Bool(true),
                        LiteralValue::Undefined,
                        LiteralValue::Undefined]);
    }

    #[test]
    fn deep_nesting_is_an_error() {
        let parens = format!("let x = {}1{};", "(".repeat(50_000), ")".repeat(50_000));
        assert!(matches!(parse(&parens),
                         Err(ParseError::TooDeeplyNested { limit: MAX_NESTING_DEPTH, .. })));

        let blocks = format!("{}{}", "{".repeat(50_000), "}".repeat(50_000));
        assert!(matches!(parse(&blocks), Err(ParseError::TooDeeplyNested { .. })));

        let sum = format!("let s = 1{};", " + 1".repeat(50_000));
        assert!(matches!(parse(&sum), Err(ParseError::TooDeeplyNested { .. })));

        let types = format!("let t: {}number{};", "(".repeat(5_000), ")".repeat(5_000));
        assert!(matches!(parse(&types), Err(ParseError::TooDeeplyNested { .. })));

        let elses = format!("if (a) {{ }}{}", " else if (a) { }".repeat(50_000));
        assert!(matches!(parse(&elses), Err(ParseError::TooDeeplyNested { .. })));
    }

    #[test]
    fn nesting_depth_recovers_after_an_error() {
        let deep = format!("let x = {}1{};", "(".repeat(1_000), ")".repeat(1_000));
        assert!(parse(&deep).is_err());

        let moderate = format!("let x = {}1{};\n{{{{{{ f(a.b.c)(1 + 2 + 3); }}}}}}",
                               "(".repeat(60),
                               ")".repeat(60));
        assert!(parse(&moderate).is_ok());
    }
}
