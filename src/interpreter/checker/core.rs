use std::{collections::HashMap, rc::Rc};

use tracing::{debug, trace};

use crate::{
    ast::{FunctionDef, Program},
    error::TypeError,
    interpreter::{
        checker::scope::Binding,
        types::{
            core::{FunctionType, ObjectType, Property, Type},
            env::TypeEnv,
        },
    },
    util::position::Position,
};

/// Bookkeeping for the function whose body is being checked.
#[derive(Debug)]
pub(in crate::interpreter::checker) struct FunctionFrame {
    /// The annotated return type, if any.
    pub declared: Option<Type>,
    /// Types of the values returned so far.
    pub returns:  Vec<Type>,
}

/// The static type checker.
///
/// Walks a program once, tracking the type of every name in a stack of
/// scopes, and collects every diagnostic it finds. Checking never stops at
/// the first problem and never modifies the program.
#[derive(Debug)]
pub struct Checker {
    pub(in crate::interpreter::checker) env:         TypeEnv,
    pub(in crate::interpreter::checker) scopes:      Vec<HashMap<String, Binding>>,
    pub(in crate::interpreter::checker) functions:   Vec<FunctionFrame>,
    pub(in crate::interpreter::checker) receivers:   Vec<Type>,
    /// Hoisted functions whose bodies are being checked.
    pub(in crate::interpreter::checker) inferring:   Vec<Rc<FunctionDef>>,
    /// How many return types are being inferred ahead of their block's end.
    pub(in crate::interpreter::checker) speculation: usize,
    pub(in crate::interpreter::checker) diagnostics: Vec<TypeError>,
}

impl Checker {
    /// Creates a checker over the given interface table.
    ///
    /// The outermost scope holds the builtin `console` object, so programs may
    /// declare their own globals without clashing with it.
    #[must_use]
    pub fn new(env: TypeEnv) -> Self {
        let mut checker = Self { env,
                                 scopes: Vec::new(),
                                 functions: Vec::new(),
                                 receivers: Vec::new(),
                                 inferring: Vec::new(),
                                 speculation: 0,
                                 diagnostics: Vec::new() };
        checker.push_scope();
        checker.declare("console", console_type(), Position::default());
        checker
    }

    /// Consumes the checker and returns the collected diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<TypeError> {
        self.diagnostics
    }

    /// Records a diagnostic.
    pub(in crate::interpreter::checker) fn report(&mut self, error: TypeError) {
        trace!(%error, "type error");
        self.diagnostics.push(error);
    }

    /// Reports a `TypeMismatch` unless `found` is assignable to `expected`.
    ///
    /// # Returns
    /// `true` if the types are compatible.
    pub(in crate::interpreter::checker) fn expect_type(&mut self,
                                                       found: &Type,
                                                       expected: &Type,
                                                       position: Position)
                                                       -> bool {
        if self.env.is_assignable(found, expected) {
            return true;
        }
        self.report(TypeError::TypeMismatch { expected: expected.to_string(),
                                              found: found.to_string(),
                                              position });
        false
    }

    /// Resolves the signature of a function from its annotations.
    ///
    /// Unannotated parameters are `unknown`. An unannotated return type is
    /// `unknown` until the body has been checked.
    pub(in crate::interpreter::checker) fn signature(&mut self, def: &FunctionDef) -> FunctionType {
        let (params, required) = self.env.resolve_params(&def.params, &mut self.diagnostics);
        let ret = def.return_type
                     .as_ref()
                     .map_or(Type::Unknown, |annotation| {
                         self.env.resolve(annotation, &mut self.diagnostics)
                     });

        FunctionType { params,
                       required,
                       variadic: false,
                       ret: Box::new(ret) }
    }

    /// Checks a function body against its signature.
    ///
    /// Parameters are bound in a fresh scope that the body's statements
    /// share, and `receiver` is the type of `this` inside the body.
    ///
    /// # Returns
    /// The function's return type: the annotation if present, otherwise the
    /// union of the types of all returned values (`void` if there are none).
    pub(in crate::interpreter::checker) fn check_function_body(&mut self,
                                                               def: &FunctionDef,
                                                               signature: &FunctionType,
                                                               receiver: Type)
                                                               -> Type {
        trace!(name = def.name.as_deref().unwrap_or("<anonymous>"), "checking function body");

        self.push_scope();
        for (param, ty) in def.params.iter().zip(&signature.params) {
            self.declare(&param.name, ty.clone(), param.position);
        }
        let declared = def.return_type.as_ref().map(|_| (*signature.ret).clone());
        self.functions.push(FunctionFrame { declared,
                                            returns: Vec::new() });
        self.receivers.push(receiver);

        self.check_statements(&def.body.statements);

        self.receivers.pop();
        let frame = self.functions.pop();
        self.pop_scope();

        match frame {
            Some(FunctionFrame { declared: Some(ty), .. }) => ty,
            Some(FunctionFrame { returns, .. }) => Type::union(returns),
            None => Type::Unknown,
        }
    }
}

/// The type of the builtin `console` object: `{ log: (...unknown[]) => void }`.
fn console_type() -> Type {
    let log = FunctionType { params:   vec![Type::Unknown],
                             required: 0,
                             variadic: true,
                             ret:      Box::new(Type::VOID), };
    Type::Object(ObjectType::new(vec![Property::required("log", Type::Function(log))]))
}

/// Type checks a whole program.
///
/// Builds the interface table, then checks every statement. Function
/// declarations are hoisted: they can be called before the line that
/// declares them, and their bodies are checked once the rest of the
/// enclosing block has been seen. The return type of an unannotated function
/// is inferred at its first use.
///
/// # Returns
/// Every diagnostic found; empty if the program is type-consistent.
///
/// # Example
/// ```
/// use tslite::{compile, interpreter::checker::core::check_program};
///
/// let ok = compile("let s: string = 'a'; s = 'b';").unwrap();
/// assert!(check_program(&ok).is_empty());
///
/// let bad = compile("let s: string = 'a'; s = 1;").unwrap();
/// assert_eq!(check_program(&bad).len(), 1);
/// ```
#[must_use]
pub fn check_program(program: &Program) -> Vec<TypeError> {
    let (env, mut diagnostics) = TypeEnv::from_program(program);
    let mut checker = Checker::new(env);

    checker.push_scope();
    checker.check_statements(&program.statements);
    checker.pop_scope();

    diagnostics.extend(checker.into_diagnostics());
    debug!(diagnostics = diagnostics.len(), "checked program");
    diagnostics
}
