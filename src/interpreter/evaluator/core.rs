use std::{cell::RefCell, rc::Rc};

use tracing::{debug, trace};

use crate::{
    ast::{Block, Expr, FunctionDef, Program, Statement},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            environment::{self, Env, Environment, Heap},
            function::core::install_builtins,
        },
        value::{core::Value, function::Closure, object::ObjectValue},
    },
    options::Options,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// How a statement finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Execution continues with the next statement.
    Normal,
    /// A `return` statement ran; the enclosing function call finishes with
    /// the value.
    Return(Value),
}

/// Stores the runtime evaluation context.
///
/// This struct holds the interpreter state: the active environment, the
/// output collected so far and the current call depth.
///
/// ## Usage
///
/// A `Context` runs one program. Dropping it releases every environment and
/// object the program created, including those kept alive by reference
/// cycles.
pub struct Context {
    /// The environment statements are currently executed in.
    pub env:          Env,
    /// Lines written by `console.log`, in order.
    pub output:       Vec<String>,
    /// The number of user function calls in progress.
    pub(crate) depth: usize,
    options:          Options,
    heap:             Heap,
}

impl Context {
    /// Creates a context whose global environment holds the builtins.
    #[must_use]
    pub fn new(options: &Options) -> Self {
        let mut heap = Heap::default();
        let globals = Environment::global();
        heap.track_frame(&globals);
        install_builtins(&globals, &mut heap);

        Self { env: globals,
               output: Vec::new(),
               options: options.clone(),
               depth: 0,
               heap }
    }

    /// Runs a whole program in the global environment.
    ///
    /// A `return` at the top level stops the program.
    ///
    /// # Errors
    /// The first runtime error raised. Output emitted before it stays in
    /// [`Context::output`].
    ///
    /// # Example
    /// ```
    /// use tslite::{compile, interpreter::evaluator::core::Context, options::Options};
    ///
    /// let program = compile("let x = 2; console.log(x * 21);").unwrap();
    /// let mut ctx = Context::new(&Options::default());
    /// ctx.run_program(&program).unwrap();
    ///
    /// assert_eq!(ctx.output, vec!["42".to_string()]);
    /// ```
    pub fn run_program(&mut self, program: &Program) -> EvalResult<()> {
        debug!(statements = program.statements.len(), "running program");
        self.exec_statements(&program.statements)?;
        debug!(lines = self.output.len(), "program finished");
        Ok(())
    }

    /// Executes statements in the current environment.
    ///
    /// Named function declarations are bound before the first statement runs,
    /// so every statement of the sequence can call them.
    pub(crate) fn exec_statements(&mut self, statements: &[Statement]) -> EvalResult<Completion> {
        for statement in statements {
            if let Statement::Function(def) = statement
               && let Some(name) = &def.name
            {
                let closure = self.make_closure(def, Some(name.clone()));
                self.env.borrow_mut().define(name, closure);
            }
        }

        for statement in statements {
            if let Completion::Return(value) = self.exec_statement(statement)? {
                return Ok(Completion::Return(value));
            }
        }
        Ok(Completion::Normal)
    }

    /// Executes a block in a fresh child of the current environment.
    pub(crate) fn exec_block(&mut self, block: &Block) -> EvalResult<Completion> {
        let env = self.child_env();
        self.in_env(env, |ctx| ctx.exec_statements(&block.statements))
    }

    /// Executes a single statement.
    pub(crate) fn exec_statement(&mut self, statement: &Statement) -> EvalResult<Completion> {
        match statement {
            Statement::VariableDeclaration { name, value, .. } => {
                let value = match value {
                    Some(expr) => self.eval_named(expr, name)?,
                    None => Value::Undefined,
                };
                self.env.borrow_mut().define(name, value);
            },
            Statement::Function(_) | Statement::Interface(_) => {},
            Statement::Expression { expr, .. } => {
                self.eval(expr)?;
            },
            Statement::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Undefined,
                };
                return Ok(Completion::Return(value));
            },
            Statement::If { condition,
                            then_branch,
                            else_branch,
                            .. } => {
                if self.eval_condition(condition)? {
                    return self.exec_block(then_branch);
                }
                if let Some(else_branch) = else_branch {
                    return self.exec_statement(else_branch);
                }
            },
            Statement::Block(block) => return self.exec_block(block),
            Statement::For { init,
                             condition,
                             update,
                             body,
                             .. } => {
                return self.exec_for(init.as_deref(), condition.as_ref(), update.as_ref(), body);
            },
            Statement::While { condition, body, .. } => return self.exec_while(condition, body),
        }
        Ok(Completion::Normal)
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation. Operands are
    /// evaluated strictly left to right.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(Value::from(value)),
            Expr::Variable { name, position } => {
                environment::lookup(&self.env, name).ok_or_else(|| {
                                                        RuntimeError::UnknownVariable { name:     name.clone(),
                                                                                        position: *position, }
                                                    })
            },
            Expr::This { position } => {
                environment::this_value(&self.env).ok_or_else(|| {
                                                      RuntimeError::UnknownVariable { name:     "this".to_string(),
                                                                                      position: *position, }
                                                  })
            },
            Expr::UnaryOp { op, expr, .. } => self.eval_unary(*op, expr),
            Expr::BinaryOp { left,
                             op,
                             right,
                             position, } => self.eval_binary(left, *op, right, *position),
            Expr::Assignment { target,
                               op,
                               value,
                               position, } => self.eval_assignment(target, *op, value, *position),
            Expr::Update { target,
                           op,
                           prefix,
                           position, } => self.eval_update(target, *op, *prefix, *position),
            Expr::Call { callee,
                         arguments,
                         position, } => self.eval_call(callee, arguments, *position),
            Expr::Member { object,
                           property,
                           position, } => {
                let object = self.eval(object)?;
                Self::get_property(&object, property, *position)
            },
            Expr::ObjectLiteral { properties, .. } => {
                let object = Rc::new(RefCell::new(ObjectValue::default()));
                self.heap.track_object(&object);
                for property in properties {
                    let value = self.eval_named(&property.value, &property.name)?;
                    object.borrow_mut().set(&property.name, value);
                }
                Ok(Value::Object(object))
            },
            Expr::Function(def) => Ok(self.make_closure(def, def.name.clone())),
        }
    }

    /// Evaluates an expression whose value is stored under `name`.
    ///
    /// An anonymous function expression takes the name, which is what it
    /// prints as.
    pub(crate) fn eval_named(&mut self, expr: &Expr, name: &str) -> EvalResult<Value> {
        match expr {
            Expr::Function(def) if def.name.is_none() => {
                Ok(self.make_closure(def, Some(name.to_string())))
            },
            other => self.eval(other),
        }
    }

    /// Evaluates a condition, which must be a boolean.
    pub(crate) fn eval_condition(&mut self, condition: &Expr) -> EvalResult<bool> {
        self.eval(condition)?.as_bool(condition.position())
    }

    /// Creates a function value closing over the current environment.
    fn make_closure(&self, def: &Rc<FunctionDef>, name: Option<String>) -> Value {
        let closure = Closure { name,
                                ..Closure::new(Rc::clone(def), Rc::clone(&self.env)) };
        Value::Function(Rc::new(closure))
    }

    /// Creates a child of the current environment.
    pub(crate) fn child_env(&mut self) -> Env {
        let env = Environment::child(&self.env);
        self.heap.track_frame(&env);
        trace!("entering scope");
        env
    }

    /// Registers a frame created outside of [`Context::child_env`].
    pub(crate) fn track_frame(&mut self, env: &Env) {
        self.heap.track_frame(env);
    }

    /// Runs `f` with `env` as the current environment, restoring the previous
    /// one afterwards, whether `f` fails or not.
    pub(crate) fn in_env<T>(&mut self, env: Env, f: impl FnOnce(&mut Self) -> EvalResult<T>) -> EvalResult<T> {
        let previous = std::mem::replace(&mut self.env, env);
        let result = f(self);
        self.env = previous;
        result
    }

    /// Returns the configured limit on nested calls.
    pub(crate) const fn max_call_depth(&self) -> usize {
        self.options.max_call_depth
    }

    /// Appends a line of output.
    pub(crate) fn emit(&mut self, line: String) {
        if self.options.echo_output {
            println!("{line}");
        }
        self.output.push(line);
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        self.heap.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compile, error::RuntimeError, util::position::Position};

    fn run(source: &str) -> (Vec<String>, EvalResult<()>) {
        let program = compile(source).unwrap();
        let mut ctx = Context::new(&Options::default());
        let result = ctx.run_program(&program);
        (std::mem::take(&mut ctx.output), result)
    }

    #[test]
    fn hoisted_functions_call_each_other() {
        let (output, result) = run("console.log(isEven(10));
                                    function isEven(n: number): boolean {
                                        if (n === 0) { return true; }
                                        return isOdd(n - 1);
                                    }
                                    function isOdd(n: number): boolean {
                                        if (n === 0) { return false; }
                                        return isEven(n - 1);
                                    }");
        assert_eq!(result, Ok(()));
        assert_eq!(output, vec!["true"]);
    }

    #[test]
    fn blocks_shadow_without_leaking() {
        let (output, result) = run("let x = 1;
                                    { let x = 2; console.log(x); }
                                    if (true) { x = 3; }
                                    console.log(x);");
        assert_eq!(result, Ok(()));
        assert_eq!(output, vec!["2", "3"]);
    }

    #[test]
    fn top_level_return_stops_the_program() {
        let (output, result) = run("console.log(1); return; console.log(2);");
        assert_eq!(result, Ok(()));
        assert_eq!(output, vec!["1"]);
    }

    #[test]
    fn this_outside_a_method_is_a_name_error() {
        let (_, result) = run("let f = function() { return this; };\nf();");
        assert_eq!(result,
                   Err(RuntimeError::UnknownVariable { name:     "this".to_string(),
                                                       position: Position::new(1, 29), }));
    }

    #[test]
    fn anonymous_functions_take_their_binding_name() {
        let (output, _) = run("let f = function() {};
                               let o = { m: function() {}, n: 1 };
                               function g() {}
                               console.log(f, o.m, g, function() {});");
        assert_eq!(output,
                   vec!["[Function: f] [Function: m] [Function: g] [Function (anonymous)]"]);
    }

    #[test]
    fn conditions_must_be_booleans() {
        let (_, result) = run("if (1) { }");
        assert!(matches!(result, Err(RuntimeError::TypeMismatch { .. })));
    }
}
