use std::{cell::RefCell, rc::Rc};

use crate::interpreter::value::core::Value;

/// A shared, mutable object.
///
/// Objects have reference semantics: copying a `Value::Object` copies the
/// handle, and every copy sees every write.
pub type ObjectRef = Rc<RefCell<ObjectValue>>;

/// The properties of an object, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ObjectValue {
    properties: Vec<(String, Value)>,
}

impl ObjectValue {
    /// Creates an object from its properties.
    ///
    /// A name given twice keeps the last value, at the position of its first
    /// occurrence.
    #[must_use]
    pub fn new(properties: impl IntoIterator<Item = (String, Value)>) -> Self {
        let mut object = Self::default();
        for (name, value) in properties {
            object.set(&name, value);
        }
        object
    }

    /// Reads a property.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.properties
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    /// Writes a property, creating it if it does not exist.
    pub fn set(&mut self, name: &str, value: Value) {
        match self.properties.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = value,
            None => self.properties.push((name.to_string(), value)),
        }
    }

    /// Iterates over the properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Returns the number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if the object has no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Removes every property, dropping the references they hold.
    pub fn clear(&mut self) {
        self.properties.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_in_place() {
        let mut object = ObjectValue::new([("a".to_string(), Value::Number(1.0)),
                                           ("b".to_string(), Value::Number(2.0))]);
        object.set("a", Value::Bool(true));
        object.set("c", Value::Undefined);

        let keys = object.iter().map(|(k, _)| k).collect::<Vec<_>>();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(object.get("a"), Some(Value::Bool(true)));
        assert_eq!(object.get("missing"), None);
    }
}
