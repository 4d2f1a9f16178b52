use std::{cell::RefCell, rc::Rc};

use tracing::trace;

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Completion, Context, EvalResult},
            environment::{self, Env, Environment, Heap},
            function::console,
        },
        value::{
            core::Value,
            function::{Arity, Closure, NativeFn, NativeFunction},
            object::ObjectValue,
        },
    },
    util::position::Position,
};

/// Defines builtin functions by generating a lookup table.
///
/// Each entry provides:
/// - the global object the function lives on and its name on it,
/// - the argument counts it accepts,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BuiltinDef` (internal metadata),
/// - `BUILTIN_TABLE` (static table read by [`install_builtins`]),
/// - `BUILTIN_FUNCTIONS` (public list of qualified builtin names).
macro_rules! builtin_functions {
    (
        $(
            $object:literal . $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            object: &'static str,
            name:   &'static str,
            arity:  Arity,
            func:   NativeFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { object: $object, name: $name, arity: $arity, func: $func },
            )*
        ];
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $(concat!($object, ".", $name),)*
        ];
    };
}

builtin_functions! {
    "console"."log" => { arity: Arity::AtLeast(0), func: console::log },
}

/// Binds every builtin into the global environment.
///
/// Builtins sharing an object name end up as properties of one object.
pub fn install_builtins(globals: &Env, heap: &mut Heap) {
    for def in BUILTIN_TABLE {
        let native = Value::Native(NativeFunction { name:  def.name,
                                                    arity: def.arity,
                                                    func:  def.func, });

        if let Some(Value::Object(object)) = environment::lookup(globals, def.object) {
            object.borrow_mut().set(def.name, native);
            continue;
        }
        let object = Rc::new(RefCell::new(ObjectValue::new([(def.name.to_string(), native)])));
        heap.track_object(&object);
        globals.borrow_mut().define(def.object, Value::Object(object));
    }
}

impl Context {
    /// Evaluates a call expression.
    ///
    /// When the callee is a member access, `receiver.method(...)`, the
    /// receiver is evaluated once and bound to `this` for the call. Arguments
    /// are evaluated left to right after the callee.
    pub(crate) fn eval_call(&mut self, callee: &Expr, arguments: &[Expr], position: Position) -> EvalResult<Value> {
        let (function, receiver) = match callee {
            Expr::Member { object,
                           property,
                           position: at, } => {
                let receiver = self.eval(object)?;
                (Self::get_property(&receiver, property, *at)?, Some(receiver))
            },
            other => (self.eval(other)?, None),
        };

        let args = arguments.iter()
                            .map(|argument| self.eval(argument))
                            .collect::<EvalResult<Vec<_>>>()?;

        self.call_value(&function, receiver, &args, position)
    }

    /// Calls a function value.
    ///
    /// # Parameters
    /// - `function`: The callee.
    /// - `receiver`: The value bound to `this`, for method calls.
    /// - `args`: Evaluated arguments.
    /// - `position`: Position of the call, for error reporting.
    ///
    /// # Errors
    /// - `NotCallable` if `function` is not a function.
    /// - `ArgumentCountMismatch` if the function does not accept that many
    ///   arguments.
    /// - `StackOverflow` if the call would exceed the configured depth.
    /// - Any error raised by the function body.
    pub fn call_value(&mut self,
                      function: &Value,
                      receiver: Option<Value>,
                      args: &[Value],
                      position: Position)
                      -> EvalResult<Value> {
        match function {
            Value::Native(native) => {
                check_arity(native.arity, args.len(), position)?;
                (native.func)(self, args, position)
            },
            Value::Function(closure) => self.call_closure(closure, receiver, args, position),
            other => Err(RuntimeError::NotCallable { found: other.type_name().to_string(),
                                                     position }),
        }
    }

    /// Executes a user-defined function.
    ///
    /// The call gets a fresh frame whose parent is the environment the
    /// function was created in. Parameters without an argument are bound to
    /// `undefined`. A body that finishes without `return` yields `undefined`.
    fn call_closure(&mut self,
                    closure: &Rc<Closure>,
                    receiver: Option<Value>,
                    args: &[Value],
                    position: Position)
                    -> EvalResult<Value> {
        check_arity(closure.arity(), args.len(), position)?;

        let limit = self.max_call_depth();
        if self.depth >= limit {
            return Err(RuntimeError::StackOverflow { limit, position });
        }

        let frame = Environment::call_frame(&closure.env, receiver);
        self.track_frame(&frame);
        {
            let mut frame = frame.borrow_mut();
            for (index, param) in closure.def.params.iter().enumerate() {
                frame.define(&param.name, args.get(index).cloned().unwrap_or(Value::Undefined));
            }
        }

        trace!(function = closure.name.as_deref().unwrap_or("(anonymous)"),
               depth = self.depth + 1,
               "call");
        self.depth += 1;
        let completion = self.in_env(frame, |ctx| ctx.exec_statements(&closure.def.body.statements));
        self.depth -= 1;

        match completion? {
            Completion::Return(value) => Ok(value),
            Completion::Normal => Ok(Value::Undefined),
        }
    }
}

/// Ensures a call supplies an accepted number of arguments.
fn check_arity(arity: Arity, found: usize, position: Position) -> EvalResult<()> {
    if arity.accepts(found) {
        return Ok(());
    }
    Err(RuntimeError::ArgumentCountMismatch { expected: arity.to_string(),
                                              found,
                                              position })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compile, options::Options};

    fn run_with(source: &str, options: &Options) -> (Vec<String>, EvalResult<()>) {
        let program = compile(source).unwrap();
        let mut ctx = Context::new(options);
        let result = ctx.run_program(&program);
        (std::mem::take(&mut ctx.output), result)
    }

    fn run(source: &str) -> (Vec<String>, EvalResult<()>) {
        run_with(source, &Options::default())
    }

    #[test]
    fn builtins_are_listed() {
        assert_eq!(BUILTIN_FUNCTIONS, &["console.log"]);
    }

    #[test]
    fn closures_keep_their_bindings() {
        let (output, result) = run("function counter() {
                                        let count = 0;
                                        return function() { count++; return count; };
                                    }
                                    let a = counter();
                                    let b = counter();
                                    a(); a();
                                    console.log(a(), b());");
        assert_eq!(result, Ok(()));
        assert_eq!(output, vec!["3 1"]);
    }

    #[test]
    fn methods_see_their_receiver() {
        let (output, result) = run("let o = {
                                        name: 'o',
                                        getName: function() { return this.name; },
                                        greet: function() { return 'hi ' + this.getName(); },
                                    };
                                    let p = { name: 'p', greet: o.greet, getName: o.getName };
                                    console.log(o.greet(), p.greet());");
        assert_eq!(result, Ok(()));
        assert_eq!(output, vec!["hi o hi p"]);
    }

    #[test]
    fn optional_parameters_default_to_undefined() {
        let (output, result) = run("function f(a: number, b?: number) { console.log(a, b); }
                                    f(1); f(1, 2);");
        assert_eq!(result, Ok(()));
        assert_eq!(output, vec!["1 undefined", "1 2"]);
    }

    #[test]
    fn argument_counts_are_checked() {
        let (_, result) = run("function f(a: number, b?: number) { }\nf(1, 2, 3);");
        assert_eq!(result,
                   Err(RuntimeError::ArgumentCountMismatch { expected: "1-2".to_string(),
                                                             found:    3,
                                                             position: Position::new(2, 2), }));
    }

    #[test]
    fn calling_a_non_function() {
        let (_, result) = run("let x = 1;\nx();");
        assert!(matches!(result, Err(RuntimeError::NotCallable { ref found, .. }) if found == "number"));
    }

    #[test]
    fn recursion_depth_is_bounded() {
        let options = Options::default().with_max_call_depth(16);
        let (_, result) = run_with("function down(n: number): number { return down(n + 1); }\ndown(0);",
                                   &options);
        assert!(matches!(result, Err(RuntimeError::StackOverflow { limit: 16, .. })));

        let (output, result) = run_with("function fact(n: number): number {
                                             if (n <= 1) { return 1; }
                                             return n * fact(n - 1);
                                         }
                                         console.log(fact(10));",
                                        &options);
        assert_eq!(result, Ok(()));
        assert_eq!(output, vec!["3628800"]);
    }
}
