use std::rc::Rc;

use crate::{
    ast::{Block, Expr, Statement},
    interpreter::evaluator::{
        core::{Completion, Context, EvalResult},
        environment::Environment,
    },
};

impl Context {
    /// Executes a C-style `for` loop.
    ///
    /// The initializer runs once in a frame of its own, so a loop variable
    /// declared there is visible to the condition, the update and the body,
    /// but not after the loop. Before every update the frame is forked:
    /// a closure created in the body keeps the loop variable as it was in
    /// that iteration.
    ///
    /// A missing condition loops until the body returns.
    ///
    /// # Parameters
    /// - `init`: The initializer statement, if any.
    /// - `condition`: Evaluated before each iteration; must be a boolean.
    /// - `update`: Evaluated after each iteration.
    /// - `body`: Runs in a fresh child frame each iteration.
    ///
    /// # Returns
    /// `Completion::Return` if the body returned, `Completion::Normal`
    /// otherwise.
    ///
    /// # Example
    /// ```
    /// use tslite::{compile, interpreter::evaluator::core::Context, options::Options};
    ///
    /// let program = compile("for (let i = 0; i < 3; i++) { console.log(i); }").unwrap();
    /// let mut ctx = Context::new(&Options::default());
    /// ctx.run_program(&program).unwrap();
    ///
    /// assert_eq!(ctx.output, vec!["0", "1", "2"]);
    /// ```
    pub(crate) fn exec_for(&mut self,
                           init: Option<&Statement>,
                           condition: Option<&Expr>,
                           update: Option<&Expr>,
                           body: &Block)
                           -> EvalResult<Completion> {
        let mut frame = self.child_env();
        if let Some(init) = init {
            self.in_env(Rc::clone(&frame), |ctx| ctx.exec_statement(init))?;
        }

        loop {
            if let Some(condition) = condition
               && !self.in_env(Rc::clone(&frame), |ctx| ctx.eval_condition(condition))?
            {
                break;
            }

            let completion = self.in_env(Rc::clone(&frame), |ctx| ctx.exec_block(body))?;
            if let Completion::Return(value) = completion {
                return Ok(Completion::Return(value));
            }

            frame = Environment::fork(&frame);
            self.track_frame(&frame);
            if let Some(update) = update {
                self.in_env(Rc::clone(&frame), |ctx| ctx.eval(update))?;
            }
        }

        Ok(Completion::Normal)
    }

    /// Executes a `while` loop.
    ///
    /// The condition must be a boolean; the body runs in a fresh child frame
    /// each iteration.
    pub(crate) fn exec_while(&mut self, condition: &Expr, body: &Block) -> EvalResult<Completion> {
        while self.eval_condition(condition)? {
            if let Completion::Return(value) = self.exec_block(body)? {
                return Ok(Completion::Return(value));
            }
        }
        Ok(Completion::Normal)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{compile, interpreter::evaluator::core::Context, options::Options};

    fn output_of(source: &str) -> Vec<String> {
        let program = compile(source).unwrap();
        let mut ctx = Context::new(&Options::default());
        ctx.run_program(&program).unwrap();
        std::mem::take(&mut ctx.output)
    }

    #[test]
    fn closures_capture_each_iteration() {
        let output = output_of("let first = function() { return -1; };
                                let last = first;
                                for (let i = 0; i < 3; i++) {
                                    if (i === 0) { first = function() { return i; }; }
                                    last = function() { return i; };
                                }
                                console.log(first(), last());");
        assert_eq!(output, vec!["0 2"]);
    }

    #[test]
    fn return_inside_loops_leaves_the_function() {
        let output = output_of("function find(limit: number): number {
                                    let n = 0;
                                    while (true) {
                                        n = n + 1;
                                        if (n * n > limit) { return n; }
                                    }
                                }
                                function firstOver(limit: number): number {
                                    for (let i = 0; ; i++) {
                                        if (i > limit) { return i; }
                                    }
                                }
                                console.log(find(50), firstOver(4));");
        assert_eq!(output, vec!["8 5"]);
    }

    #[test]
    fn loop_variables_do_not_leak() {
        let program = compile("for (let i = 0; i < 1; i++) { }\nconsole.log(i);").unwrap();
        let mut ctx = Context::new(&Options::default());

        assert!(ctx.run_program(&program).is_err());
    }
}
