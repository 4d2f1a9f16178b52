use crate::{
    ast::{BinaryOperator, Expr},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            environment,
        },
        value::{core::Value, object::ObjectRef},
    },
    util::position::Position,
};

/// A location an assignment or update writes to.
pub(crate) enum Place {
    /// A variable, looked up through the scope chain.
    Variable { name: String, position: Position },
    /// A property of an object.
    Property { object: ObjectRef, name: String },
}

impl Context {
    /// Reads a property of a value.
    ///
    /// Missing properties of objects read as `undefined`; any other value has
    /// no properties at all.
    ///
    /// # Errors
    /// `UnknownProperty` if `value` is not an object.
    ///
    /// # Example
    /// ```
    /// use tslite::interpreter::{
    ///     evaluator::core::Context,
    ///     value::{core::Value, object::ObjectValue},
    /// };
    /// use tslite::util::position::Position;
    ///
    /// let at = Position::default();
    /// let object = Value::from(ObjectValue::new([("a".to_string(), Value::Number(1.0))]));
    ///
    /// assert_eq!(Context::get_property(&object, "a", at), Ok(Value::Number(1.0)));
    /// assert_eq!(Context::get_property(&object, "b", at), Ok(Value::Undefined));
    /// assert!(Context::get_property(&Value::Number(1.0), "a", at).is_err());
    /// ```
    pub fn get_property(value: &Value, name: &str, position: Position) -> EvalResult<Value> {
        let object = Self::expect_object(value, name, position)?;
        let property = object.borrow().get(name);
        Ok(property.unwrap_or(Value::Undefined))
    }

    fn expect_object<'v>(value: &'v Value, property: &str, position: Position) -> EvalResult<&'v ObjectRef> {
        value.as_object()
             .ok_or_else(|| RuntimeError::UnknownProperty { property: property.to_string(),
                                                            found: value.type_name().to_string(),
                                                            position })
    }

    /// Evaluates the target of an assignment or update down to the place it
    /// names. The object of a member target is evaluated here, once.
    pub(crate) fn resolve_place(&mut self, target: &Expr) -> EvalResult<Place> {
        match target {
            Expr::Variable { name, position } => Ok(Place::Variable { name:     name.clone(),
                                                                      position: *position, }),
            Expr::Member { object,
                           property,
                           position, } => {
                let value = self.eval(object)?;
                let object = Self::expect_object(&value, property, *position)?;
                Ok(Place::Property { object: object.clone(),
                                     name:   property.clone(), })
            },
            other => Err(RuntimeError::TypeMismatch { expected: "variable or property".to_string(),
                                                      found:    "expression".to_string(),
                                                      position: other.position(), }),
        }
    }

    /// Reads the current value of a place.
    pub(crate) fn read_place(&self, place: &Place) -> EvalResult<Value> {
        match place {
            Place::Variable { name, position } => {
                environment::lookup(&self.env, name).ok_or_else(|| {
                                                        RuntimeError::UnknownVariable { name:     name.clone(),
                                                                                        position: *position, }
                                                    })
            },
            Place::Property { object, name } => Ok(object.borrow().get(name).unwrap_or(Value::Undefined)),
        }
    }

    /// Writes a value to a place. Writing a missing property creates it;
    /// assigning an undeclared variable is an error.
    pub(crate) fn write_place(&self, place: &Place, value: Value) -> EvalResult<()> {
        match place {
            Place::Variable { name, position } => {
                if environment::assign(&self.env, name, value) {
                    Ok(())
                } else {
                    Err(RuntimeError::UnknownVariable { name:     name.clone(),
                                                        position: *position, })
                }
            },
            Place::Property { object, name } => {
                object.borrow_mut().set(name, value);
                Ok(())
            },
        }
    }

    /// Evaluates `target = value` or a compound assignment like
    /// `target += value`.
    ///
    /// The target is resolved first, then (for compound forms) read, then the
    /// right-hand side is evaluated.
    ///
    /// # Returns
    /// The value that was stored.
    pub(crate) fn eval_assignment(&mut self,
                                  target: &Expr,
                                  op: Option<BinaryOperator>,
                                  value: &Expr,
                                  position: Position)
                                  -> EvalResult<Value> {
        let place = self.resolve_place(target)?;
        let new_value = match op {
            Some(op) => {
                let current = self.read_place(&place)?;
                let operand = self.eval(value)?;
                Self::apply_binary(op, &current, &operand, position)?
            },
            None => match &place {
                Place::Variable { name, .. } | Place::Property { name, .. } => {
                    self.eval_named(value, name)?
                },
            },
        };

        self.write_place(&place, new_value.clone())?;
        Ok(new_value)
    }
}
