use std::rc::Rc;

use crate::util::position::Position;

/// Represents a literal value in the language.
///
/// `LiteralValue` covers all raw, constant values that can appear directly in
/// source code. `undefined` and `null` both evaluate to the single undefined
/// value.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// A 64-bit floating-point literal.
    Number(f64),
    /// A string literal with escapes already decoded.
    Str(String),
    /// A boolean literal value: `true` or `false`.
    Bool(bool),
    /// `undefined` or `null`.
    Undefined,
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

/// A parsed program: the ordered list of its top-level statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// The top-level statements, in source order.
    pub statements: Vec<Statement>,
}

/// A brace-delimited sequence of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Statements inside the block.
    pub statements: Vec<Statement>,
    /// Position of the opening brace.
    pub position:   Position,
}

/// A function, either declared with a name or written as an expression.
///
/// Function definitions are reference-counted so that every function value
/// created from the same source shares one body.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// The function name; `None` for anonymous function expressions.
    pub name:        Option<String>,
    /// Declared parameters, in order.
    pub params:      Vec<Parameter>,
    /// The declared return type, if annotated.
    pub return_type: Option<TypeAnnotation>,
    /// The function body.
    pub body:        Block,
    /// Position of the `function` keyword.
    pub position:    Position,
}

impl FunctionDef {
    /// Returns the number of parameters a call must supply at least.
    ///
    /// Optional parameters may only be omitted from the end of an argument
    /// list, so every parameter up to the last required one counts.
    #[must_use]
    pub fn required_params(&self) -> usize {
        self.params
            .iter()
            .rposition(|p| !p.optional)
            .map_or(0, |last| last + 1)
    }
}

/// A function parameter, in a definition or in a function type.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Parameter name.
    pub name:       String,
    /// Declared type, if annotated.
    pub annotation: Option<TypeAnnotation>,
    /// Whether the parameter was written as `name?`.
    pub optional:   bool,
    /// Position of the parameter name.
    pub position:   Position,
}

/// An `interface Name { ... }` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    /// Interface name.
    pub name:     String,
    /// Declared members; methods are stored with a function type annotation.
    pub members:  Vec<PropertySignature>,
    /// Position of the `interface` keyword.
    pub position: Position,
}

/// One member of an interface or of an inline object type.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySignature {
    /// Property name.
    pub name:       String,
    /// Property type.
    pub annotation: TypeAnnotation,
    /// Whether the property was written as `name?`.
    pub optional:   bool,
    /// Position of the property name.
    pub position:   Position,
}

/// A type as written in the source.
///
/// Annotations are resolved into checker types by the type environment;
/// names stay unresolved here so that interfaces may be referenced before
/// they are declared.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeAnnotation {
    /// A primitive or interface name, e.g. `string` or `Foo`.
    Named {
        /// The name as written.
        name:     String,
        /// Position of the name.
        position: Position,
    },
    /// An inline object type, e.g. `{ name: string; age?: number }`.
    Object {
        /// The members, in source order.
        members:  Vec<PropertySignature>,
        /// Position of the opening brace.
        position: Position,
    },
    /// A function type, e.g. `(a: number) => string`.
    Function {
        /// The parameters, in order.
        params:      Vec<Parameter>,
        /// The return type.
        return_type: Box<Self>,
        /// Position of the opening parenthesis.
        position:    Position,
    },
    /// A union of two or more types, e.g. `string | number`.
    Union {
        /// The members, flattened.
        members:  Vec<Self>,
        /// Position of the first member.
        position: Position,
    },
    /// An intersection of two or more types, e.g. `Foo & Bar`.
    Intersection {
        /// The members, flattened.
        members:  Vec<Self>,
        /// Position of the first member.
        position: Position,
    },
}

impl TypeAnnotation {
    /// Returns the source position of the annotation.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::Named { position, .. }
            | Self::Object { position, .. }
            | Self::Function { position, .. }
            | Self::Union { position, .. }
            | Self::Intersection { position, .. } => *position,
        }
    }
}

/// A statement node.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `let name[: Type] [= value];`
    VariableDeclaration {
        /// Name of the declared variable.
        name:       String,
        /// Declared type, if annotated.
        annotation: Option<TypeAnnotation>,
        /// Initial value, if any.
        value:      Option<Expr>,
        /// Position of the `let` keyword.
        position:   Position,
    },
    /// `function name(...) { ... }`
    Function(Rc<FunctionDef>),
    /// `interface Name { ... }`
    Interface(InterfaceDecl),
    /// An expression evaluated for its effects.
    Expression {
        /// The expression.
        expr:     Expr,
        /// Position of the expression.
        position: Position,
    },
    /// `return [value];`
    Return {
        /// The returned value, if any.
        value:    Option<Expr>,
        /// Position of the `return` keyword.
        position: Position,
    },
    /// `if (condition) { ... } [else ...]`
    If {
        /// The condition.
        condition:   Expr,
        /// Block run when the condition is `true`.
        then_branch: Block,
        /// Either another `if` statement or a block.
        else_branch: Option<Box<Self>>,
        /// Position of the `if` keyword.
        position:    Position,
    },
    /// A bare `{ ... }` block.
    Block(Block),
    /// `for (init; condition; update) { ... }`
    For {
        /// Runs once before the loop, in the loop's own scope.
        init:      Option<Box<Self>>,
        /// Checked before every iteration; a missing condition loops forever.
        condition: Option<Expr>,
        /// Evaluated after every iteration.
        update:    Option<Expr>,
        /// The loop body.
        body:      Block,
        /// Position of the `for` keyword.
        position:  Position,
    },
    /// `while (condition) { ... }`
    While {
        /// Checked before every iteration.
        condition: Expr,
        /// The loop body.
        body:      Block,
        /// Position of the `while` keyword.
        position:  Position,
    },
}

impl Statement {
    /// Returns the source position of the statement.
    #[must_use]
    pub fn position(&self) -> Position {
        match self {
            Self::VariableDeclaration { position, .. }
            | Self::Expression { position, .. }
            | Self::Return { position, .. }
            | Self::If { position, .. }
            | Self::For { position, .. }
            | Self::While { position, .. } => *position,
            Self::Function(def) => def.position,
            Self::Interface(decl) => decl.position,
            Self::Block(block) => block.position,
        }
    }
}

/// One `name: value` entry of an object literal.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectProperty {
    /// Property name.
    pub name:     String,
    /// Property value.
    pub value:    Expr,
    /// Position of the property name.
    pub position: Position,
}

/// An abstract syntax tree (AST) node representing an expression in the
/// language.
///
/// Every variant carries the position of the construct so that both the
/// checker and the interpreter can report errors against the source.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal {
        /// The constant value.
        value:    LiteralValue,
        /// Position in the source code.
        position: Position,
    },
    /// Reference to a variable by name.
    Variable {
        /// Name of the variable.
        name:     String,
        /// Position in the source code.
        position: Position,
    },
    /// The `this` receiver.
    This {
        /// Position in the source code.
        position: Position,
    },
    /// A prefix unary operation, `-x` or `!x`.
    UnaryOp {
        /// The unary operator to apply.
        op:       UnaryOperator,
        /// The operand expression.
        expr:     Box<Self>,
        /// Position of the operator.
        position: Position,
    },
    /// A binary operation, including the short-circuit logical operators.
    BinaryOp {
        /// Left operand.
        left:     Box<Self>,
        /// The operator.
        op:       BinaryOperator,
        /// Right operand.
        right:    Box<Self>,
        /// Position of the operator.
        position: Position,
    },
    /// Assignment, `target = value` or a compound form like `target += value`.
    Assignment {
        /// A variable or member expression.
        target:   Box<Self>,
        /// The arithmetic operator of a compound assignment.
        op:       Option<BinaryOperator>,
        /// The assigned value.
        value:    Box<Self>,
        /// Position of the assignment operator.
        position: Position,
    },
    /// `++x`, `x++`, `--x` or `x--`.
    Update {
        /// A variable or member expression.
        target:   Box<Self>,
        /// Increment or decrement.
        op:       UpdateOperator,
        /// Whether the operator was written before the target.
        prefix:   bool,
        /// Position of the operator.
        position: Position,
    },
    /// Function call expression, e.g. `f(x)` or `obj.method(x)`.
    Call {
        /// The called expression.
        callee:    Box<Self>,
        /// Arguments, in order.
        arguments: Vec<Self>,
        /// Position of the opening parenthesis.
        position:  Position,
    },
    /// Property access, `object.property`.
    Member {
        /// The accessed object.
        object:   Box<Self>,
        /// The property name.
        property: String,
        /// Position of the property name.
        position: Position,
    },
    /// `{ name: value, ... }`
    ObjectLiteral {
        /// The properties, in source order.
        properties: Vec<ObjectProperty>,
        /// Position of the opening brace.
        position:   Position,
    },
    /// `function [name](...) { ... }` used as a value.
    Function(Rc<FunctionDef>),
}

impl Expr {
    /// Returns the source position of the expression.
    ///
    /// For operators this is the position of the operator token, which is
    /// where diagnostics about the operation point.
    #[must_use]
    pub fn position(&self) -> Position {
        match self {
            Self::Literal { position, .. }
            | Self::Variable { position, .. }
            | Self::This { position }
            | Self::UnaryOp { position, .. }
            | Self::BinaryOp { position, .. }
            | Self::Assignment { position, .. }
            | Self::Update { position, .. }
            | Self::Call { position, .. }
            | Self::Member { position, .. }
            | Self::ObjectLiteral { position, .. } => *position,
            Self::Function(def) => def.position,
        }
    }
}

/// Binary operators supported by the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition or string concatenation (`+`).
    Add,
    /// Subtraction (`-`).
    Sub,
    /// Multiplication (`*`).
    Mul,
    /// Division (`/`).
    Div,
    /// Remainder (`%`).
    Mod,
    /// Less than (`<`).
    Less,
    /// Greater than (`>`).
    Greater,
    /// Less than or equal (`<=`).
    LessEqual,
    /// Greater than or equal (`>=`).
    GreaterEqual,
    /// Equality (`==`).
    Equal,
    /// Inequality (`!=`).
    NotEqual,
    /// Strict equality (`===`).
    StrictEqual,
    /// Strict inequality (`!==`).
    StrictNotEqual,
    /// Logical AND (`&&`).
    And,
    /// Logical OR (`||`).
    Or,
}

impl BinaryOperator {
    /// Returns `true` for `+ - * / %`.
    #[must_use]
    pub const fn is_arithmetic(self) -> bool {
        matches!(self, Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Mod)
    }

    /// Returns `true` for `< > <= >=`.
    #[must_use]
    pub const fn is_relational(self) -> bool {
        matches!(self, Self::Less | Self::Greater | Self::LessEqual | Self::GreaterEqual)
    }

    /// Returns `true` for `== != === !==`.
    #[must_use]
    pub const fn is_equality(self) -> bool {
        matches!(self,
                 Self::Equal | Self::NotEqual | Self::StrictEqual | Self::StrictNotEqual)
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::StrictEqual => "===",
            Self::StrictNotEqual => "!==",
            Self::And => "&&",
            Self::Or => "||",
        };
        f.write_str(symbol)
    }
}

/// Prefix unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Numeric negation (`-`).
    Negate,
    /// Logical NOT (`!`).
    Not,
}

/// Increment and decrement operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOperator {
    /// `++`
    Increment,
    /// `--`
    Decrement,
}

impl UpdateOperator {
    /// The amount the operator adds to its target.
    #[must_use]
    pub const fn delta(self) -> f64 {
        match self {
            Self::Increment => 1.0,
            Self::Decrement => -1.0,
        }
    }
}
