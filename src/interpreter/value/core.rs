use std::{cell::RefCell, rc::Rc};

use crate::{
    ast::LiteralValue,
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{
            function::{Closure, NativeFunction},
            object::{ObjectRef, ObjectValue},
        },
    },
    util::position::Position,
};

/// Represents a runtime value in the interpreter.
///
/// This enum models all the possible types that can appear in expressions,
/// assignments, function returns, and conditions. Primitives are copied;
/// objects and functions are shared by reference.
#[derive(Debug, Clone)]
pub enum Value {
    /// A numeric value (double precision floating-point).
    Number(f64),
    /// A string.
    Str(Rc<str>),
    /// A boolean value (`true` or `false`).
    /// Produced by comparison operators (`<`, `==`, `!=`, etc.) or logical
    /// operations (`!`). Conditions of `if`, `for` and `while` must evaluate
    /// to `Bool`.
    Bool(bool),
    /// The value of `undefined` and `null`, of missing properties, and of
    /// calls that return nothing.
    Undefined,
    /// A mutable object with reference semantics.
    Object(ObjectRef),
    /// A user-defined function and its captured environment.
    Function(Rc<Closure>),
    /// A function implemented by the interpreter.
    Native(NativeFunction),
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(Rc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(Rc::from(v))
    }
}

impl From<ObjectValue> for Value {
    fn from(v: ObjectValue) -> Self {
        Self::Object(Rc::new(RefCell::new(v)))
    }
}

impl From<&LiteralValue> for Value {
    fn from(literal: &LiteralValue) -> Self {
        match literal {
            LiteralValue::Number(n) => Self::Number(*n),
            LiteralValue::Str(s) => Self::from(s.as_str()),
            LiteralValue::Bool(b) => Self::Bool(*b),
            LiteralValue::Undefined => Self::Undefined,
        }
    }
}

/// Values compare the way `===` does: primitives by value, objects and
/// functions by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Undefined, Self::Undefined) => true,
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Native(a), Self::Native(b)) => a.name == b.name,
            _ => false,
        }
    }
}

impl Value {
    /// Returns the name of the value's runtime type, as used in error
    /// messages.
    ///
    /// # Example
    /// ```
    /// use tslite::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Number(1.0).type_name(), "number");
    /// assert_eq!(Value::from("s").type_name(), "string");
    /// assert_eq!(Value::Undefined.type_name(), "undefined");
    /// ```
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Str(_) => "string",
            Self::Bool(_) => "boolean",
            Self::Undefined => "undefined",
            Self::Object(_) => "object",
            Self::Function(_) | Self::Native(_) => "function",
        }
    }

    /// Converts the value to an `f64`, or returns an error if it is not a
    /// number.
    ///
    /// # Parameters
    /// - `position`: Source position for error reporting.
    ///
    /// # Errors
    /// `TypeMismatch` if the value is not a number.
    pub fn as_number(&self, position: Position) -> EvalResult<f64> {
        match self {
            Self::Number(n) => Ok(*n),
            other => Err(RuntimeError::TypeMismatch { expected: "number".to_string(),
                                                      found: other.type_name().to_string(),
                                                      position }),
        }
    }

    /// Converts the value to a `bool`, or returns an error if it is not a
    /// boolean.
    ///
    /// Conditions are strict: there is no truthiness, so `if (1)` is an
    /// error rather than a true branch.
    ///
    /// # Errors
    /// `TypeMismatch` if the value is not a boolean.
    pub fn as_bool(&self, position: Position) -> EvalResult<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            other => Err(RuntimeError::TypeMismatch { expected: "boolean".to_string(),
                                                      found: other.type_name().to_string(),
                                                      position }),
        }
    }

    /// Returns the object handle if the value is an object.
    #[must_use]
    pub const fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_identity_for_objects() {
        let a = Value::from(ObjectValue::default());
        let b = Value::from(ObjectValue::default());

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(Value::from("x"), Value::from("x".to_string()));
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
        assert_ne!(Value::Number(0.0), Value::Bool(false));
    }

    #[test]
    fn strict_conversions() {
        let at = Position::new(1, 1);
        assert_eq!(Value::Number(2.0).as_number(at), Ok(2.0));
        assert!(Value::Bool(true).as_number(at).is_err());
        assert!(Value::Number(1.0).as_bool(at).is_err());
    }
}
