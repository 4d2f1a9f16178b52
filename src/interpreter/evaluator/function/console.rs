use crate::{
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
    util::position::Position,
};

/// Writes one line of output: the display strings of all arguments, joined
/// by a single space.
///
/// Accepts any number of arguments; with none it writes an empty line.
///
/// # Returns
/// `undefined`.
///
/// # Example
/// ```
/// use tslite::{
///     interpreter::{
///         evaluator::{core::Context, function::console::log},
///         value::core::Value,
///     },
///     options::Options,
///     util::position::Position,
/// };
///
/// let mut ctx = Context::new(&Options::default());
/// let args = [Value::from("fizz"), Value::Number(3.0)];
/// let result = log(&mut ctx, &args, Position::default()).unwrap();
///
/// assert_eq!(result, Value::Undefined);
/// assert_eq!(ctx.output, vec!["fizz 3"]);
/// ```
pub fn log(ctx: &mut Context, args: &[Value], _position: Position) -> EvalResult<Value> {
    let line = args.iter()
                   .map(ToString::to_string)
                   .collect::<Vec<_>>()
                   .join(" ");
    ctx.emit(line);
    Ok(Value::Undefined)
}
