use std::{fmt, rc::Rc};

use crate::{
    interpreter::value::{core::Value, object::ObjectRef},
    util::num::format_number,
};

/// Values print the way `console.log` shows its arguments: strings raw,
/// numbers without a trailing `.0`, objects as `{ key: value }` with nested
/// strings quoted.
///
/// # Example
/// ```
/// use tslite::interpreter::value::{core::Value, object::ObjectValue};
///
/// let object = Value::from(ObjectValue::new([("a".to_string(), Value::Number(1.0)),
///                                            ("b".to_string(), Value::from("x"))]));
///
/// assert_eq!(Value::Number(3.0).to_string(), "3");
/// assert_eq!(Value::from("hi").to_string(), "hi");
/// assert_eq!(object.to_string(), "{ a: 1, b: 'x' }");
/// ```
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            other => write_nested(f, other, &mut Vec::new()),
        }
    }
}

/// Writes a value as it appears inside an object.
///
/// `seen` holds the objects currently being printed; meeting one of them
/// again prints `[Circular]` instead of recursing forever.
fn write_nested(f: &mut fmt::Formatter<'_>, value: &Value, seen: &mut Vec<ObjectRef>) -> fmt::Result {
    match value {
        Value::Number(n) => f.write_str(&format_number(*n)),
        Value::Str(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Undefined => f.write_str("undefined"),
        Value::Function(closure) => match &closure.name {
            Some(name) => write!(f, "[Function: {name}]"),
            None => f.write_str("[Function (anonymous)]"),
        },
        Value::Native(native) => write!(f, "[Function: {}]", native.name),
        Value::Object(object) => {
            if seen.iter().any(|s| Rc::ptr_eq(s, object)) {
                return f.write_str("[Circular]");
            }
            let Ok(borrowed) = object.try_borrow() else {
                return f.write_str("[Object]");
            };
            if borrowed.is_empty() {
                return f.write_str("{}");
            }

            seen.push(Rc::clone(object));
            f.write_str("{ ")?;
            for (i, (key, value)) in borrowed.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{key}: ")?;
                write_nested(f, value, seen)?;
            }
            seen.pop();
            f.write_str(" }")
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::value::object::ObjectValue;

    #[test]
    fn nested_objects_and_cycles() {
        let inner = Value::from(ObjectValue::new([("name".to_string(), Value::from("it's"))]));
        let outer = Value::from(ObjectValue::new([("inner".to_string(), inner),
                                                  ("empty".to_string(), Value::from(ObjectValue::default()))]));
        assert_eq!(outer.to_string(), "{ inner: { name: 'it\\'s' }, empty: {} }");

        let object = outer.as_object().unwrap();
        object.borrow_mut().set("me", outer.clone());
        assert_eq!(outer.to_string(),
                   "{ inner: { name: 'it\\'s' }, empty: {}, me: [Circular] }");
        object.borrow_mut().clear();
    }

    #[test]
    fn primitives() {
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Number(-0.0).to_string(), "0");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Undefined.to_string(), "undefined");
    }
}
