use crate::{
    ast::{BinaryOperator, Expr, LiteralValue, ObjectProperty, UnaryOperator},
    error::TypeError,
    interpreter::{
        checker::core::Checker,
        types::core::{FunctionType, ObjectType, Primitive, Property, Type},
    },
    util::position::Position,
};

impl Checker {
    /// Computes the type of an expression, reporting every problem found in
    /// it.
    ///
    /// Expressions whose type cannot be determined, because of an error or
    /// because they involve `unknown`, have type `unknown`, which keeps one
    /// mistake from producing a cascade of diagnostics.
    pub(in crate::interpreter::checker) fn check_expr(&mut self, expr: &Expr) -> Type {
        match expr {
            Expr::Literal { value, .. } => match value {
                LiteralValue::Number(_) => Type::NUMBER,
                LiteralValue::Str(_) => Type::STRING,
                LiteralValue::Bool(_) => Type::BOOLEAN,
                LiteralValue::Undefined => Type::VOID,
            },
            Expr::Variable { name, position } => self.check_variable(name, *position),
            Expr::This { position } => match self.receivers.last() {
                Some(receiver) => receiver.clone(),
                None => {
                    self.report(TypeError::UnknownName { name:     "this".to_string(),
                                                         position: *position, });
                    Type::Unknown
                },
            },
            Expr::UnaryOp { op, expr, .. } => {
                let ty = self.check_expr(expr);
                let wanted = match op {
                    UnaryOperator::Negate => Type::NUMBER,
                    UnaryOperator::Not => Type::BOOLEAN,
                };
                self.expect_type(&ty, &wanted, expr.position());
                wanted
            },
            Expr::BinaryOp { left,
                             op,
                             right,
                             position, } => {
                let left_ty = self.check_expr(left);
                let right_ty = self.check_expr(right);
                self.binary_result(*op, &left_ty, &right_ty, *position)
            },
            Expr::Assignment { target,
                               op,
                               value,
                               position, } => {
                let target_ty = self.check_expr(target);
                let value_ty = self.check_expr(value);
                let assigned = match op {
                    Some(op) => self.binary_result(*op, &target_ty, &value_ty, *position),
                    None => value_ty,
                };
                self.expect_type(&assigned, &target_ty, value.position());
                target_ty
            },
            Expr::Update { target, position, .. } => {
                let ty = self.check_expr(target);
                self.expect_type(&ty, &Type::NUMBER, *position);
                Type::NUMBER
            },
            Expr::Call { callee,
                         arguments,
                         position, } => self.check_call(callee, arguments, *position),
            Expr::Member { object,
                           property,
                           position, } => {
                let object_ty = self.check_expr(object);
                self.member_type(&object_ty, property, *position)
            },
            Expr::ObjectLiteral { properties, .. } => self.check_object_literal(properties),
            Expr::Function(def) => {
                let signature = self.signature(def);
                let ret = self.check_function_body(def, &signature, Type::Unknown);
                Type::Function(FunctionType { ret: Box::new(ret),
                                              ..signature })
            },
        }
    }

    fn check_variable(&mut self, name: &str, position: Position) -> Type {
        let Some(depth) = self.scope_of(name) else {
            self.report(TypeError::UnknownName { name: name.to_string(),
                                                 position });
            return Type::Unknown;
        };
        self.infer_pending(depth, name);
        self.binding(depth, name).map_or(Type::Unknown, |binding| binding.ty.clone())
    }

    /// Looks up a property, reporting `UnknownProperty` if it does not exist.
    fn member_type(&mut self, object: &Type, property: &str, position: Position) -> Type {
        if let Some(ty) = self.env.property_type(object, property) {
            return ty;
        }
        self.report(TypeError::UnknownProperty { property: property.to_string(),
                                                 on: object.to_string(),
                                                 position });
        Type::Unknown
    }

    /// Computes the result type of a binary operator and checks its operands.
    ///
    /// - `+` adds two numbers, or concatenates if either side is a string.
    /// - `- * / %` need two numbers.
    /// - `< > <= >=` need two numbers or two strings.
    /// - `== != === !==` accept any operands.
    /// - `&& ||` need two booleans.
    pub(in crate::interpreter::checker) fn binary_result(&mut self,
                                                         op: BinaryOperator,
                                                         left: &Type,
                                                         right: &Type,
                                                         position: Position)
                                                         -> Type {
        let is_string = |ty: &Type| ty.is_primitive(Primitive::String);

        match op {
            BinaryOperator::Add => {
                if is_string(left) || is_string(right) {
                    return Type::STRING;
                }
                if left.is_unknown() || right.is_unknown() {
                    return Type::Unknown;
                }
                self.expect_type(left, &Type::NUMBER, position);
                self.expect_type(right, &Type::NUMBER, position);
                Type::NUMBER
            },
            BinaryOperator::Sub | BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod => {
                self.expect_type(left, &Type::NUMBER, position);
                self.expect_type(right, &Type::NUMBER, position);
                Type::NUMBER
            },
            BinaryOperator::Less
            | BinaryOperator::Greater
            | BinaryOperator::LessEqual
            | BinaryOperator::GreaterEqual => {
                let comparable = if is_string(left) || is_string(right) {
                    Type::STRING
                } else {
                    Type::NUMBER
                };
                self.expect_type(left, &comparable, position);
                self.expect_type(right, &comparable, position);
                Type::BOOLEAN
            },
            BinaryOperator::Equal
            | BinaryOperator::NotEqual
            | BinaryOperator::StrictEqual
            | BinaryOperator::StrictNotEqual => Type::BOOLEAN,
            BinaryOperator::And | BinaryOperator::Or => {
                self.expect_type(left, &Type::BOOLEAN, position);
                self.expect_type(right, &Type::BOOLEAN, position);
                Type::BOOLEAN
            },
        }
    }

    /// Checks a call: the callee must be a function, the argument count must
    /// fit its parameters, and each argument must be assignable to its
    /// parameter.
    fn check_call(&mut self, callee: &Expr, arguments: &[Expr], position: Position) -> Type {
        let callee_ty = self.check_expr(callee);
        let argument_tys = arguments.iter()
                                    .map(|argument| (self.check_expr(argument), argument.position()))
                                    .collect::<Vec<_>>();

        if callee_ty.is_unknown() {
            return Type::Unknown;
        }
        let Some(function) = self.env.callable(&callee_ty) else {
            self.report(TypeError::NotCallable { found: callee_ty.to_string(),
                                                 position });
            return Type::Unknown;
        };

        if !function.accepts_arity(arguments.len()) {
            self.report(TypeError::ArgumentCountMismatch { expected: function.arity(),
                                                           found: arguments.len(),
                                                           position });
        }
        for (index, (found, at)) in argument_tys.iter().enumerate() {
            if let Some(param) = function.param(index) {
                self.expect_type(found, param, *at);
            }
        }

        *function.ret
    }

    /// Checks an object literal and synthesizes its type.
    ///
    /// Non-function properties are checked first, in order. Function-valued
    /// properties are first typed from their signatures, so that every method
    /// can see every other through `this`; their bodies are then checked with
    /// `this` bound to the literal's type. A method without a return
    /// annotation gets its inferred return type once its body is checked.
    fn check_object_literal(&mut self, properties: &[ObjectProperty]) -> Type {
        let mut shape = ObjectType::default();
        let mut methods = Vec::new();

        for property in properties {
            let ty = match &property.value {
                Expr::Function(def) => {
                    let signature = self.signature(def);
                    methods.push((property.name.clone(), def, signature.clone()));
                    Type::Function(signature)
                },
                other => self.check_expr(other),
            };

            if shape.get(&property.name).is_some() {
                self.report(TypeError::DuplicateDeclaration { name:     property.name.clone(),
                                                              position: property.position, });
                continue;
            }
            shape.properties.push(Property::required(property.name.clone(), ty));
        }

        for (name, def, signature) in methods {
            let receiver = Type::Object(shape.clone());
            let ret = self.check_function_body(def, &signature, receiver);
            if def.return_type.is_none()
               && let Some(slot) = shape.get_mut(&name)
            {
                slot.ty = Type::Function(FunctionType { ret: Box::new(ret),
                                                        ..signature });
            }
        }

        Type::Object(shape)
    }
}
