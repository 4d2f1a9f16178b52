use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates `&&` and `||`.
    ///
    /// Both operands must be booleans. The right operand is evaluated only
    /// if the left one does not decide the result, so `false && f()` never
    /// calls `f`.
    pub(crate) fn eval_logic(&mut self, op: BinaryOperator, left: &Expr, right: &Expr) -> EvalResult<Value> {
        let left = self.eval_condition(left)?;
        let decided = match op {
            BinaryOperator::And => !left,
            _ => left,
        };
        if decided {
            return Ok(Value::Bool(left));
        }

        Ok(Value::Bool(self.eval_condition(right)?))
    }
}

#[cfg(test)]
mod tests {
    use crate::{compile, interpreter::evaluator::core::Context, options::Options};

    #[test]
    fn short_circuits() {
        let program = compile("function loud(): boolean { console.log('called'); return true; }
                               console.log(false && loud(), true || loud(), true && loud());")
                      .unwrap();
        let mut ctx = Context::new(&Options::default());
        ctx.run_program(&program).unwrap();

        assert_eq!(ctx.output, vec!["called", "false true true"]);
    }
}
