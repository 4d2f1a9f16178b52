use std::collections::HashMap;

use tracing::debug;

use crate::{
    ast::{Parameter, Program, PropertySignature, Statement, TypeAnnotation},
    error::TypeError,
    interpreter::types::core::{FunctionType, ObjectType, Property, Type},
};

/// The interface table of a program.
///
/// Built once, before any expression is checked, and read-only afterwards.
/// Interface names are collected before any shape is resolved, so interfaces
/// may refer to each other (and to themselves) regardless of declaration
/// order.
#[derive(Debug, Clone, Default)]
pub struct TypeEnv {
    interfaces: HashMap<String, ObjectType>,
}

impl TypeEnv {
    /// Builds the interface table from a program's top-level declarations.
    ///
    /// # Returns
    /// The table and the diagnostics found while building it: duplicate
    /// interface names, unknown type names in member annotations, and
    /// intersections whose members disagree on a property. Unknown names
    /// resolve to `unknown` so that checking can continue.
    ///
    /// # Example
    /// ```
    /// use tslite::{compile, interpreter::types::env::TypeEnv};
    ///
    /// let program = compile("interface A { b: B } interface B { name: string }").unwrap();
    /// let (env, diagnostics) = TypeEnv::from_program(&program);
    ///
    /// assert!(diagnostics.is_empty());
    /// assert_eq!(env.interface("A").unwrap().to_string(), "{ b: B }");
    /// ```
    #[must_use]
    pub fn from_program(program: &Program) -> (Self, Vec<TypeError>) {
        let mut env = Self::default();
        let mut diagnostics = Vec::new();

        let mut declarations = Vec::new();
        for statement in &program.statements {
            if let Statement::Interface(decl) = statement {
                if env.interfaces.contains_key(&decl.name) {
                    diagnostics.push(TypeError::DuplicateDeclaration { name:     decl.name.clone(),
                                                                       position: decl.position, });
                    continue;
                }
                env.interfaces.insert(decl.name.clone(), ObjectType::default());
                declarations.push(decl);
            }
        }

        for decl in &declarations {
            let shape = env.resolve_members(&decl.members, &mut diagnostics);
            env.interfaces.insert(decl.name.clone(), shape);
        }

        for decl in &declarations {
            for member in &decl.members {
                env.validate_intersections(&member.annotation, &mut diagnostics);
            }
        }

        debug!(interfaces = env.interfaces.len(),
               diagnostics = diagnostics.len(),
               "built type environment");
        (env, diagnostics)
    }

    /// Returns the shape of a declared interface.
    #[must_use]
    pub fn interface(&self, name: &str) -> Option<&ObjectType> {
        self.interfaces.get(name)
    }

    /// Resolves a written type annotation into a [`Type`].
    ///
    /// Primitive names map to primitives (`undefined` and `null` to `void`),
    /// `any` and `unknown` to [`Type::Unknown`], and every other name must be
    /// a declared interface.
    ///
    /// # Parameters
    /// - `annotation`: The annotation to resolve.
    /// - `diagnostics`: Receives `UnknownType` for undeclared names,
    ///   `DuplicateDeclaration` for repeated members, and `TypeMismatch` for
    ///   intersections with conflicting members.
    pub fn resolve(&self, annotation: &TypeAnnotation, diagnostics: &mut Vec<TypeError>) -> Type {
        let ty = self.resolve_inner(annotation, diagnostics);
        self.validate_intersections(annotation, diagnostics);
        ty
    }

    /// Resolves a parameter list into parameter types and the required count.
    pub fn resolve_params(&self,
                          params: &[Parameter],
                          diagnostics: &mut Vec<TypeError>)
                          -> (Vec<Type>, usize) {
        let types = params.iter()
                          .map(|p| {
                              p.annotation
                               .as_ref()
                               .map_or(Type::Unknown, |a| self.resolve(a, diagnostics))
                          })
                          .collect();
        (types, required_count(params))
    }

    fn resolve_inner(&self, annotation: &TypeAnnotation, diagnostics: &mut Vec<TypeError>) -> Type {
        match annotation {
            TypeAnnotation::Named { name, position } => match name.as_str() {
                "string" => Type::STRING,
                "number" => Type::NUMBER,
                "boolean" => Type::BOOLEAN,
                "void" | "undefined" | "null" => Type::VOID,
                "any" | "unknown" => Type::Unknown,
                _ if self.interfaces.contains_key(name) => Type::Named(name.clone()),
                _ => {
                    diagnostics.push(TypeError::UnknownType { name:     name.clone(),
                                                              position: *position, });
                    Type::Unknown
                },
            },
            TypeAnnotation::Object { members, .. } => {
                Type::Object(self.resolve_members(members, diagnostics))
            },
            TypeAnnotation::Function { params,
                                       return_type,
                                       .. } => {
                let types = params.iter()
                                  .map(|p| {
                                      p.annotation
                                       .as_ref()
                                       .map_or(Type::Unknown, |a| self.resolve_inner(a, diagnostics))
                                  })
                                  .collect();
                Type::Function(FunctionType { params:   types,
                                              required: required_count(params),
                                              variadic: false,
                                              ret:      Box::new(self.resolve_inner(return_type,
                                                                                    diagnostics)), })
            },
            TypeAnnotation::Union { members, .. } => {
                Type::union(members.iter()
                                   .map(|m| self.resolve_inner(m, diagnostics))
                                   .collect())
            },
            TypeAnnotation::Intersection { members, .. } => {
                Type::intersection(members.iter()
                                          .map(|m| self.resolve_inner(m, diagnostics))
                                          .collect())
            },
        }
    }

    fn resolve_members(&self,
                       members: &[PropertySignature],
                       diagnostics: &mut Vec<TypeError>)
                       -> ObjectType {
        let mut shape = ObjectType::default();
        for member in members {
            if shape.get(&member.name).is_some() {
                diagnostics.push(TypeError::DuplicateDeclaration { name:     member.name.clone(),
                                                                   position: member.position, });
                continue;
            }
            let ty = self.resolve_inner(&member.annotation, diagnostics);
            shape.properties.push(Property { name: member.name.clone(),
                                             ty,
                                             optional: member.optional });
        }
        shape
    }

    /// Reports intersections in an annotation whose members cannot all hold
    /// at once.
    ///
    /// Runs after every interface has its shape, since deciding whether two
    /// property types agree needs the full table.
    fn validate_intersections(&self, annotation: &TypeAnnotation, diagnostics: &mut Vec<TypeError>) {
        match annotation {
            TypeAnnotation::Named { .. } => {},
            TypeAnnotation::Object { members, .. } => {
                for member in members {
                    self.validate_intersections(&member.annotation, diagnostics);
                }
            },
            TypeAnnotation::Function { params,
                                       return_type,
                                       .. } => {
                for param in params {
                    if let Some(annotation) = &param.annotation {
                        self.validate_intersections(annotation, diagnostics);
                    }
                }
                self.validate_intersections(return_type, diagnostics);
            },
            TypeAnnotation::Union { members, .. } => {
                for member in members {
                    self.validate_intersections(member, diagnostics);
                }
            },
            TypeAnnotation::Intersection { members, position } => {
                for member in members {
                    self.validate_intersections(member, diagnostics);
                }
                let mut scratch = Vec::new();
                let types = members.iter()
                                   .map(|m| self.resolve_inner(m, &mut scratch))
                                   .collect::<Vec<_>>();
                if let Some((expected, found)) = self.intersection_conflict(&types) {
                    diagnostics.push(TypeError::TypeMismatch { expected: expected.to_string(),
                                                               found:    found.to_string(),
                                                               position: *position, });
                }
            },
        }
    }
}

/// Counts the parameters a call must supply: everything up to the last
/// parameter not marked optional.
fn required_count(params: &[Parameter]) -> usize {
    params.iter()
          .rposition(|p| !p.optional)
          .map_or(0, |last| last + 1)
}
