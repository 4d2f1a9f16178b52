use std::cmp::Ordering;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
    util::position::Position,
};

impl Context {
    /// Evaluates relational and equality operators.
    ///
    /// `==` and `===` are the same operator: there is no coercion, so values
    /// of different types are never equal. Objects and functions compare by
    /// identity.
    ///
    /// Relational operators compare two numbers or two strings; any other
    /// combination is a `TypeMismatch`.
    ///
    /// # Example
    /// ```
    /// use tslite::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    ///     util::position::Position,
    /// };
    ///
    /// let at = Position::default();
    /// let less = Context::eval_comparison(BinaryOperator::Less, &Value::from("a"), &Value::from("b"), at);
    /// let equal = Context::eval_comparison(BinaryOperator::Equal, &Value::Number(1.0), &Value::from("1"), at);
    ///
    /// assert_eq!(less, Ok(Value::Bool(true)));
    /// assert_eq!(equal, Ok(Value::Bool(false)));
    /// ```
    pub fn eval_comparison(op: BinaryOperator,
                           left: &Value,
                           right: &Value,
                           position: Position)
                           -> EvalResult<Value> {
        use BinaryOperator::{
            Equal, Greater, GreaterEqual, Less, LessEqual, NotEqual, StrictEqual, StrictNotEqual,
        };

        match op {
            Equal | StrictEqual => Ok(Value::Bool(left == right)),
            NotEqual | StrictNotEqual => Ok(Value::Bool(left != right)),
            Less | Greater | LessEqual | GreaterEqual => {
                let ordering = Self::compare(left, right, position)?;
                let result = ordering.is_some_and(|ordering| match op {
                                                               Less => ordering.is_lt(),
                                                               Greater => ordering.is_gt(),
                                                               LessEqual => ordering.is_le(),
                                                               _ => ordering.is_ge(),
                                                           });
                Ok(Value::Bool(result))
            },
            _ => Err(RuntimeError::TypeMismatch { expected: "comparison operator".to_string(),
                                                  found: op.to_string(),
                                                  position }),
        }
    }

    /// Orders two numbers or two strings. `None` means the operands are
    /// unordered, which happens only with `NaN`.
    fn compare(left: &Value, right: &Value, position: Position) -> EvalResult<Option<Ordering>> {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(a.partial_cmp(b)),
            (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
            (Value::Str(_), other) => Err(mismatch("string", other, position)),
            (Value::Number(_), other) | (other, _) => Err(mismatch("number", other, position)),
        }
    }
}

fn mismatch(expected: &str, found: &Value, position: Position) -> RuntimeError {
    RuntimeError::TypeMismatch { expected: expected.to_string(),
                                 found: found.type_name().to_string(),
                                 position }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compare(op: BinaryOperator, left: impl Into<Value>, right: impl Into<Value>) -> EvalResult<Value> {
        Context::eval_comparison(op, &left.into(), &right.into(), Position::new(2, 3))
    }

    #[test]
    fn numbers_and_strings() {
        assert_eq!(compare(BinaryOperator::LessEqual, 2.0, 2.0), Ok(Value::Bool(true)));
        assert_eq!(compare(BinaryOperator::Greater, "b", "abc"), Ok(Value::Bool(true)));
        assert_eq!(compare(BinaryOperator::Less, f64::NAN, 1.0), Ok(Value::Bool(false)));
        assert_eq!(compare(BinaryOperator::GreaterEqual, f64::NAN, 1.0), Ok(Value::Bool(false)));
    }

    #[test]
    fn equality_never_coerces() {
        assert_eq!(compare(BinaryOperator::Equal, 0.0, false), Ok(Value::Bool(false)));
        assert_eq!(compare(BinaryOperator::StrictNotEqual, "1", 1.0), Ok(Value::Bool(true)));
        assert_eq!(compare(BinaryOperator::Equal, "x", "x"), Ok(Value::Bool(true)));
    }

    #[test]
    fn mixed_relational_operands() {
        assert_eq!(compare(BinaryOperator::Less, 1.0, "2"),
                   Err(RuntimeError::TypeMismatch { expected: "number".to_string(),
                                                    found:    "string".to_string(),
                                                    position: Position::new(2, 3), }));
        assert_eq!(compare(BinaryOperator::Less, true, 1.0),
                   Err(RuntimeError::TypeMismatch { expected: "number".to_string(),
                                                    found:    "boolean".to_string(),
                                                    position: Position::new(2, 3), }));
    }
}
