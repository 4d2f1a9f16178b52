use std::{fmt, rc::Rc};

use crate::{
    ast::FunctionDef,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            environment::Env,
        },
        value::core::Value,
    },
    util::position::Position,
};

/// A user-defined function together with the environment it was created in.
///
/// The body is shared with the syntax tree; the captured environment stays
/// alive for as long as the closure does, which is what lets nested
/// functions keep reading and writing the variables of their enclosing call.
pub struct Closure {
    /// The function's definition.
    pub def:  Rc<FunctionDef>,
    /// The environment the function was created in.
    pub env:  Env,
    /// The name shown when the function is printed.
    ///
    /// Declared functions use their own name; anonymous function expressions
    /// take the name of the variable or property they are first stored in.
    pub name: Option<String>,
}

impl Closure {
    /// Creates a closure over `env`.
    #[must_use]
    pub fn new(def: Rc<FunctionDef>, env: Env) -> Self {
        let name = def.name.clone();
        Self { def, env, name }
    }

    /// Returns the argument counts the function accepts.
    #[must_use]
    pub fn arity(&self) -> Arity {
        Arity::between(self.def.required_params(), self.def.params.len())
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
         .field("name", &self.name)
         .field("params", &self.def.params.len())
         .finish_non_exhaustive()
    }
}

/// The argument counts a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many arguments.
    Exact(usize),
    /// Between the two counts, inclusive.
    Range(usize, usize),
    /// This many arguments or more.
    AtLeast(usize),
}

impl Arity {
    /// Computes the arity of a user-defined function from its parameters.
    ///
    /// # Example
    /// ```
    /// use tslite::interpreter::value::function::Arity;
    ///
    /// assert_eq!(Arity::between(2, 2), Arity::Exact(2));
    /// assert_eq!(Arity::between(1, 3).to_string(), "1-3");
    /// assert!(Arity::AtLeast(0).accepts(5));
    /// ```
    #[must_use]
    pub const fn between(required: usize, total: usize) -> Self {
        if required == total {
            Self::Exact(total)
        } else {
            Self::Range(required, total)
        }
    }

    /// Tests whether a call with `count` arguments is allowed.
    #[must_use]
    pub const fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exact(n) => count == n,
            Self::Range(min, max) => min <= count && count <= max,
            Self::AtLeast(min) => count >= min,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::Range(min, max) => write!(f, "{min}-{max}"),
            Self::AtLeast(min) => write!(f, "at least {min}"),
        }
    }
}

/// Signature of a function implemented by the interpreter itself.
pub type NativeFn = fn(&mut Context, &[Value], Position) -> EvalResult<Value>;

/// A function implemented by the interpreter, such as `console.log`.
#[derive(Clone, Copy)]
pub struct NativeFunction {
    /// The name shown when the function is printed.
    pub name:  &'static str,
    /// The accepted argument counts.
    pub arity: Arity,
    /// The implementation.
    pub func:  NativeFn,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({})", self.name)
    }
}
