/// The static type checker.
///
/// Walks the syntax tree with a stack of scopes, computes the type of every
/// expression and collects diagnostics for everything that is not
/// type-consistent. The checker never stops at the first problem and never
/// changes the tree.
///
/// # Responsibilities
/// - Resolves annotations against the interface table.
/// - Hoists function declarations and infers unannotated return types.
/// - Types `this` inside methods of object literals.
pub mod checker;
/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator walks the syntax tree, evaluates expressions and statements,
/// manages nested environments and closures, and collects the program's
/// output. It is the core execution engine of the interpreter.
///
/// # Responsibilities
/// - Evaluates AST nodes strictly left to right.
/// - Handles variables, closures, method receivers and control flow.
/// - Reports runtime errors such as division by zero or calling a
///   non-function, keeping the output produced before them.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer (tokenizer) reads the raw source text and produces a stream of
/// tokens, each corresponding to meaningful language elements such as numbers,
/// strings, identifiers, keywords, operators and delimiters. This is the
/// first stage of interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with their source
///   positions.
/// - Skips whitespace and comments.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// an AST that represents the syntactic structure of the program, including
/// type annotations and interface declarations.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes (statements, expressions,
///   annotations).
/// - Validates correct grammar and syntax, reporting errors with positions.
pub mod parser;
/// The static type model.
///
/// Defines the types the checker works with, the table of declared
/// interfaces, and the structural assignability relation between types.
pub mod types;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares all the value types used during interpretation:
/// numbers, strings, booleans, `undefined`, objects and functions. It also
/// provides their printed form and the strict conversions the evaluator
/// relies on.
pub mod value;
