use crate::{
    ast::{BinaryOperator, Expr},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
    util::position::Position,
};

impl Context {
    /// Evaluates a binary expression.
    ///
    /// `&&` and `||` evaluate their right operand only when needed; every
    /// other operator evaluates both operands, left first, and hands them to
    /// [`Context::apply_binary`].
    pub(crate) fn eval_binary(&mut self,
                              left: &Expr,
                              op: BinaryOperator,
                              right: &Expr,
                              position: Position)
                              -> EvalResult<Value> {
        if matches!(op, BinaryOperator::And | BinaryOperator::Or) {
            return self.eval_logic(op, left, right);
        }

        let left = self.eval(left)?;
        let right = self.eval(right)?;
        Self::apply_binary(op, &left, &right, position)
    }

    /// Applies a non-logical binary operator to two values.
    ///
    /// - `+` adds two numbers, or concatenates the display strings of both
    ///   operands when either is a string.
    /// - `- * / %` need two numbers; dividing by zero is an error.
    /// - Relational and equality operators go to `eval_comparison`.
    ///
    /// # Parameters
    /// - `op`: The operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `position`: Position of the expression, for error reporting.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing the evaluated result.
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
    /// let sum = Context::apply_binary(BinaryOperator::Add, &Value::Number(3.0), &Value::Number(4.0), at);
    /// let text = Context::apply_binary(BinaryOperator::Add, &Value::from("n = "), &Value::Number(4.0), at);
    ///
    /// assert_eq!(sum, Ok(Value::Number(7.0)));
    /// assert_eq!(text, Ok(Value::from("n = 4")));
    /// ```
    pub fn apply_binary(op: BinaryOperator,
                        left: &Value,
                        right: &Value,
                        position: Position)
                        -> EvalResult<Value> {
        use BinaryOperator::{Add, And, Div, Mod, Mul, Or, Sub};

        match op {
            Add => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::Str(_), _) | (_, Value::Str(_)) => Ok(Value::from(format!("{left}{right}"))),
                _ => {
                    let (a, b) = Self::numeric_operands(left, right, position)?;
                    Ok(Value::Number(a + b))
                },
            },
            Sub | Mul | Div | Mod => {
                let (a, b) = Self::numeric_operands(left, right, position)?;
                if matches!(op, Div | Mod) && b == 0.0 {
                    return Err(RuntimeError::DivisionByZero { position });
                }

                Ok(Value::Number(match op {
                                     Sub => a - b,
                                     Mul => a * b,
                                     Div => a / b,
                                     _ => a % b,
                                 }))
            },
            And | Or => {
                Ok(Value::Bool(match op {
                                   And => left.as_bool(position)? && right.as_bool(position)?,
                                   _ => left.as_bool(position)? || right.as_bool(position)?,
                               }))
            },
            _ => Self::eval_comparison(op, left, right, position),
        }
    }

    fn numeric_operands(left: &Value, right: &Value, position: Position) -> EvalResult<(f64, f64)> {
        Ok((left.as_number(position)?, right.as_number(position)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(op: BinaryOperator, left: impl Into<Value>, right: impl Into<Value>) -> EvalResult<Value> {
        Context::apply_binary(op, &left.into(), &right.into(), Position::new(1, 1))
    }

    #[test]
    fn arithmetic() {
        assert_eq!(apply(BinaryOperator::Sub, 10.0, 4.0), Ok(Value::Number(6.0)));
        assert_eq!(apply(BinaryOperator::Mul, 2.5, 4.0), Ok(Value::Number(10.0)));
        assert_eq!(apply(BinaryOperator::Div, 7.0, 2.0), Ok(Value::Number(3.5)));
        assert_eq!(apply(BinaryOperator::Mod, -7.0, 3.0), Ok(Value::Number(-1.0)));
    }

    #[test]
    fn concatenation_uses_display_strings() {
        assert_eq!(apply(BinaryOperator::Add, 1.5, "x"), Ok(Value::from("1.5x")));
        assert_eq!(apply(BinaryOperator::Add, "a", true), Ok(Value::from("atrue")));
    }

    #[test]
    fn division_by_zero() {
        let at = Position::new(1, 1);
        assert_eq!(apply(BinaryOperator::Div, 1.0, 0.0),
                   Err(RuntimeError::DivisionByZero { position: at }));
        assert_eq!(apply(BinaryOperator::Mod, 1.0, 0.0),
                   Err(RuntimeError::DivisionByZero { position: at }));
    }

    #[test]
    fn mixed_operands_are_rejected() {
        assert!(matches!(apply(BinaryOperator::Add, 1.0, true),
                         Err(RuntimeError::TypeMismatch { .. })));
        assert!(matches!(apply(BinaryOperator::Sub, "3", 1.0),
                         Err(RuntimeError::TypeMismatch { .. })));
    }
}
