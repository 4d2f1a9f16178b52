use crate::{
    ast::{Expr, UnaryOperator, UpdateOperator},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
    util::position::Position,
};

impl Context {
    /// Evaluates a unary operation.
    ///
    /// Supported operators:
    /// - `Negate`: numeric negation; the operand must be a number.
    /// - `Not`: boolean negation; the operand must be a boolean.
    ///
    /// # Example
    /// ```
    /// use tslite::{compile, interpreter::evaluator::core::Context, options::Options};
    ///
    /// let program = compile("console.log(-(2 + 3), !false);").unwrap();
    /// let mut ctx = Context::new(&Options::default());
    /// ctx.run_program(&program).unwrap();
    ///
    /// assert_eq!(ctx.output, vec!["-5 true"]);
    /// ```
    pub(crate) fn eval_unary(&mut self, op: UnaryOperator, operand: &Expr) -> EvalResult<Value> {
        let value = self.eval(operand)?;
        let position = operand.position();

        match op {
            UnaryOperator::Negate => Ok(Value::Number(-value.as_number(position)?)),
            UnaryOperator::Not => Ok(Value::Bool(!value.as_bool(position)?)),
        }
    }

    /// Evaluates `++`/`--` in prefix or postfix form.
    ///
    /// The target must hold a number. Prefix forms yield the updated value,
    /// postfix forms the value before the update.
    pub(crate) fn eval_update(&mut self,
                              target: &Expr,
                              op: UpdateOperator,
                              prefix: bool,
                              position: Position)
                              -> EvalResult<Value> {
        let place = self.resolve_place(target)?;
        let old = self.read_place(&place)?.as_number(position)?;
        let new = old + op.delta();
        self.write_place(&place, Value::Number(new))?;

        Ok(Value::Number(if prefix { new } else { old }))
    }
}

#[cfg(test)]
mod tests {
    use crate::{compile, error::RuntimeError, interpreter::evaluator::core::Context, options::Options};

    fn run(source: &str) -> (Vec<String>, Result<(), RuntimeError>) {
        let program = compile(source).unwrap();
        let mut ctx = Context::new(&Options::default());
        let result = ctx.run_program(&program);
        (std::mem::take(&mut ctx.output), result)
    }

    #[test]
    fn prefix_and_postfix_updates() {
        let (output, result) = run("let i = 5;
                                    let o = { n: 1 };
                                    console.log(i++, i, ++i, --o.n, o.n--, o.n);");
        assert_eq!(result, Ok(()));
        assert_eq!(output, vec!["5 6 7 0 0 -1"]);
    }

    #[test]
    fn operands_are_strict() {
        assert!(matches!(run("console.log(-true);").1, Err(RuntimeError::TypeMismatch { .. })));
        assert!(matches!(run("console.log(!0);").1, Err(RuntimeError::TypeMismatch { .. })));
        assert!(matches!(run("let s = 'a'; s++;").1, Err(RuntimeError::TypeMismatch { .. })));
    }
}
