use std::rc::Rc;

use tracing::trace;

use crate::{
    ast::{Block, Expr, FunctionDef, Statement},
    error::TypeError,
    interpreter::{
        checker::core::Checker,
        types::core::{FunctionType, Type},
    },
};

impl Checker {
    /// Checks a sequence of statements sharing the innermost scope.
    ///
    /// Function declarations are bound first so that any statement of the
    /// sequence may call them. Their bodies are checked last, when every
    /// variable of the sequence is known, and the binding of each function
    /// without a return annotation is then refined with the inferred return
    /// type.
    pub(in crate::interpreter::checker) fn check_statements(&mut self, statements: &[Statement]) {
        let depth = self.scopes.len().saturating_sub(1);
        let mut hoisted: Vec<(Rc<FunctionDef>, FunctionType)> = Vec::new();
        for statement in statements {
            if let Statement::Function(def) = statement {
                let signature = self.signature(def);
                if let Some(name) = &def.name {
                    self.declare_function(name, Type::Function(signature.clone()), def);
                }
                hoisted.push((Rc::clone(def), signature));
            }
        }

        for statement in statements {
            self.check_statement(statement);
        }

        // Inference ahead of use only needs the return types, and those of
        // the functions used here were inferred on demand.
        if self.speculation > 0 {
            return;
        }

        for (def, signature) in hoisted {
            self.inferring.push(Rc::clone(&def));
            let ret = self.check_function_body(&def, &signature, Type::Unknown);
            self.inferring.pop();

            if def.return_type.is_none()
               && let Some(name) = &def.name
               && self.binding(depth, name).is_some_and(|binding| binding.position == def.position)
            {
                let refined = FunctionType { ret: Box::new(ret),
                                             ..signature };
                self.refine(depth, name, Type::Function(refined));
            }
        }
    }

    /// Infers the return type of a hoisted function at the first use of its
    /// name, if it is still pending.
    ///
    /// The body is checked against the scopes visible where the function is
    /// declared; names of its block declared after the use are not known yet.
    /// Diagnostics found on the way are dropped, since the body is checked
    /// again at the end of its block. A function whose body is already being
    /// checked keeps its `unknown` return type, which ends recursion.
    pub(in crate::interpreter::checker) fn infer_pending(&mut self, depth: usize, name: &str) {
        let Some(binding) = self.binding(depth, name) else {
            return;
        };
        let (Some(def), Type::Function(signature)) = (binding.pending.clone(), binding.ty.clone()) else {
            return;
        };
        if self.inferring.iter().any(|active| Rc::ptr_eq(active, &def)) {
            return;
        }
        trace!(name, "inferring return type at first use");

        let inner = self.scopes.split_off(depth + 1);
        let reported = self.diagnostics.len();
        self.inferring.push(Rc::clone(&def));
        self.speculation += 1;

        let ret = self.check_function_body(&def, &signature, Type::Unknown);

        self.speculation -= 1;
        self.inferring.pop();
        self.diagnostics.truncate(reported);
        self.scopes.extend(inner);

        let refined = FunctionType { ret: Box::new(ret),
                                     ..signature };
        self.refine(depth, name, Type::Function(refined));
    }

    /// Checks a block in a scope of its own.
    pub(in crate::interpreter::checker) fn check_block(&mut self, block: &Block) {
        self.push_scope();
        self.check_statements(&block.statements);
        self.pop_scope();
    }

    /// Checks a single statement.
    ///
    /// Function declarations are skipped here; [`Checker::check_statements`]
    /// handles them. Interface declarations were consumed when the interface
    /// table was built.
    pub(in crate::interpreter::checker) fn check_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::VariableDeclaration { name,
                                             annotation,
                                             value,
                                             position, } => {
                let declared = annotation.as_ref()
                                         .map(|a| self.env.resolve(a, &mut self.diagnostics));
                let initial = value.as_ref().map(|v| (self.check_expr(v), v.position()));

                let ty = match (declared, initial) {
                    (Some(declared), Some((found, at))) => {
                        self.expect_type(&found, &declared, at);
                        declared
                    },
                    (Some(declared), None) => declared,
                    (None, Some((found, _))) => found,
                    (None, None) => Type::Unknown,
                };
                self.declare(name, ty, *position);
            },
            Statement::Function(_) | Statement::Interface(_) => {},
            Statement::Expression { expr, .. } => {
                self.check_expr(expr);
            },
            Statement::Return { value, position } => {
                let (ty, at) = value.as_ref()
                                    .map_or((Type::VOID, *position), |v| (self.check_expr(v), v.position()));
                if self.functions.is_empty() {
                    self.report(TypeError::ReturnOutsideFunction { position: *position });
                }
                let declared = self.functions.last().and_then(|frame| frame.declared.clone());
                if let Some(declared) = declared {
                    self.expect_type(&ty, &declared, at);
                }
                if let Some(frame) = self.functions.last_mut() {
                    frame.returns.push(ty);
                }
            },
            Statement::If { condition,
                            then_branch,
                            else_branch,
                            .. } => {
                self.check_condition(condition);
                self.check_block(then_branch);
                if let Some(else_branch) = else_branch {
                    self.check_statement(else_branch);
                }
            },
            Statement::Block(block) => self.check_block(block),
            Statement::For { init,
                             condition,
                             update,
                             body,
                             .. } => {
                self.push_scope();
                if let Some(init) = init {
                    self.check_statement(init);
                }
                if let Some(condition) = condition {
                    self.check_condition(condition);
                }
                if let Some(update) = update {
                    self.check_expr(update);
                }
                self.check_block(body);
                self.pop_scope();
            },
            Statement::While { condition, body, .. } => {
                self.check_condition(condition);
                self.check_block(body);
            },
        }
    }

    /// Conditions must be booleans.
    fn check_condition(&mut self, condition: &Expr) {
        let ty = self.check_expr(condition);
        self.expect_type(&ty, &Type::BOOLEAN, condition.position());
    }
}
