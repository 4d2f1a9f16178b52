use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::FunctionDef,
    error::TypeError,
    interpreter::{checker::core::Checker, types::core::Type},
    util::position::Position,
};

/// A name known to the checker, with its declared or inferred type.
#[derive(Debug, Clone)]
pub struct Binding {
    /// The type values assigned to the name must be compatible with.
    pub ty:       Type,
    /// Where the name was declared.
    pub position: Position,
    /// A hoisted function without a return annotation whose return type has
    /// not been inferred yet.
    pub pending:  Option<Rc<FunctionDef>>,
}

impl Checker {
    /// Pushes a new innermost scope.
    pub(in crate::interpreter::checker) fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pops the innermost scope.
    pub(in crate::interpreter::checker) fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Declares a name in the innermost scope.
    ///
    /// A name may only be declared once per scope; a second declaration is
    /// reported and ignored. Shadowing a name from an outer scope is fine.
    pub(in crate::interpreter::checker) fn declare(&mut self, name: &str, ty: Type, position: Position) {
        self.insert(name, Binding { ty,
                                    position,
                                    pending: None });
    }

    /// Declares a hoisted function in the innermost scope.
    ///
    /// Without a return annotation the function's return type stays pending
    /// until the first use of the name or the end of the block, whichever
    /// comes first.
    pub(in crate::interpreter::checker) fn declare_function(&mut self,
                                                            name: &str,
                                                            ty: Type,
                                                            def: &Rc<FunctionDef>) {
        let pending = def.return_type.is_none().then(|| Rc::clone(def));
        self.insert(name, Binding { ty,
                                    position: def.position,
                                    pending });
    }

    fn insert(&mut self, name: &str, binding: Binding) {
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };
        if scope.contains_key(name) {
            self.diagnostics.push(TypeError::DuplicateDeclaration { name:     name.to_string(),
                                                                    position: binding.position, });
            return;
        }
        scope.insert(name.to_string(), binding);
    }

    /// Replaces the type of a name declared in the scope at `depth` and marks
    /// its return type as inferred.
    pub(in crate::interpreter::checker) fn refine(&mut self, depth: usize, name: &str, ty: Type) {
        if let Some(binding) = self.scopes.get_mut(depth).and_then(|scope| scope.get_mut(name)) {
            binding.ty = ty;
            binding.pending = None;
        }
    }

    /// Finds the scope that declares a name, searching from the innermost
    /// scope outwards.
    ///
    /// # Returns
    /// The index of the scope in the scope stack.
    pub(in crate::interpreter::checker) fn scope_of(&self, name: &str) -> Option<usize> {
        self.scopes.iter().rposition(|scope| scope.contains_key(name))
    }

    /// Returns the binding of a name in the scope at `depth`.
    pub(in crate::interpreter::checker) fn binding(&self, depth: usize, name: &str) -> Option<&Binding> {
        self.scopes.get(depth).and_then(|scope| scope.get(name))
    }
}
