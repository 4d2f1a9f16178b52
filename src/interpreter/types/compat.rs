use crate::interpreter::types::{
    core::{FunctionType, ObjectType, Property, Type},
    env::TypeEnv,
};

impl TypeEnv {
    /// Decides whether a value of type `source` may be used where `target`
    /// is required.
    ///
    /// Assignability is structural. `unknown` on either side is always
    /// compatible. Interface references are expanded through the table, and
    /// a pair of references already under comparison is assumed compatible,
    /// so recursive interfaces terminate. Object types use width subtyping:
    /// extra properties in the source are fine, but every required property
    /// of the target must be present and required in the source.
    ///
    /// # Example
    /// ```
    /// use tslite::{
    ///     compile,
    ///     interpreter::types::{core::{ObjectType, Property, Type}, env::TypeEnv},
    /// };
    ///
    /// let program = compile("interface Foo { name: string }").unwrap();
    /// let (env, _) = TypeEnv::from_program(&program);
    /// let literal = Type::Object(ObjectType::new(vec![Property::required("name", Type::STRING),
    ///                                                 Property::required("age", Type::NUMBER)]));
    ///
    /// assert!(env.is_assignable(&literal, &Type::Named("Foo".into())));
    /// assert!(!env.is_assignable(&Type::Named("Foo".into()), &literal));
    /// ```
    #[must_use]
    pub fn is_assignable(&self, source: &Type, target: &Type) -> bool {
        let mut assumptions = Vec::new();
        self.assignable(source, target, &mut assumptions)
    }

    fn assignable(&self,
                  source: &Type,
                  target: &Type,
                  assumptions: &mut Vec<(String, String)>)
                  -> bool {
        if source == target || source.is_unknown() || target.is_unknown() {
            return true;
        }

        if let (Type::Named(s), Type::Named(t)) = (source, target) {
            let pair = (s.clone(), t.clone());
            if assumptions.contains(&pair) {
                return true;
            }
            assumptions.push(pair);
            let result = self.assignable(&self.expand(source), &self.expand(target), assumptions);
            assumptions.pop();
            return result;
        }
        if matches!(source, Type::Named(_)) {
            return self.assignable(&self.expand(source), target, assumptions);
        }
        if matches!(target, Type::Named(_)) {
            return self.assignable(source, &self.expand(target), assumptions);
        }

        match (source, target) {
            (Type::Union(members), _) => members.iter().all(|m| self.assignable(m, target, assumptions)),
            (_, Type::Union(members)) => members.iter().any(|m| self.assignable(source, m, assumptions)),
            (_, Type::Intersection(members)) => {
                members.iter().all(|m| self.assignable(source, m, assumptions))
            },
            (Type::Intersection(members), _) => {
                members.iter().any(|m| self.assignable(m, target, assumptions))
                || self.shape_of(source)
                       .is_some_and(|shape| {
                           self.assignable(&Type::Object(shape), target, assumptions)
                       })
            },
            (Type::Primitive(s), Type::Primitive(t)) => s == t,
            (Type::Object(s), Type::Object(t)) => self.object_assignable(s, t, assumptions),
            (Type::Function(s), Type::Function(t)) => self.function_assignable(s, t, assumptions),
            _ => false,
        }
    }

    /// Width subtyping between two object shapes.
    fn object_assignable(&self,
                         source: &ObjectType,
                         target: &ObjectType,
                         assumptions: &mut Vec<(String, String)>)
                         -> bool {
        target.properties.iter().all(|wanted| match source.get(&wanted.name) {
                                    Some(found) => {
                                        (wanted.optional || !found.optional)
                                        && self.assignable(&found.ty, &wanted.ty, assumptions)
                                    },
                                    None => wanted.optional,
                                })
    }

    /// Parameters are contravariant and the return type covariant.
    fn function_assignable(&self,
                           source: &FunctionType,
                           target: &FunctionType,
                           assumptions: &mut Vec<(String, String)>)
                           -> bool {
        let same_shape = source.params.len() == target.params.len()
                         || source.variadic
                         || target.variadic;
        if !same_shape {
            return false;
        }

        let count = source.params.len().max(target.params.len());
        for index in 0..count {
            if let (Some(s), Some(t)) = (source.param(index), target.param(index))
               && !self.assignable(t, s, assumptions)
            {
                return false;
            }
        }

        self.assignable(&source.ret, &target.ret, assumptions)
    }

    /// Replaces an interface reference by its shape.
    ///
    /// References to undeclared interfaces were already reported when the
    /// annotation was resolved; they expand to `unknown`.
    fn expand(&self, ty: &Type) -> Type {
        match ty {
            Type::Named(name) => self.interface(name).map_or(Type::Unknown, |shape| Type::Object(shape.clone())),
            other => other.clone(),
        }
    }

    /// Returns the object shape of a type, if it has one.
    ///
    /// Interfaces expand to their declared shape. The shape of an
    /// intersection is the union of its members' property sets; a property
    /// declared by several members keeps the narrowest of its types.
    /// Members without a shape, such as primitives, contribute nothing.
    #[must_use]
    pub fn shape_of(&self, ty: &Type) -> Option<ObjectType> {
        match ty {
            Type::Object(shape) => Some(shape.clone()),
            Type::Named(name) => self.interface(name).cloned(),
            Type::Intersection(members) => {
                let mut merged: Option<ObjectType> = None;
                for shape in members.iter().filter_map(|m| self.shape_of(m)) {
                    let target = merged.get_or_insert_with(ObjectType::default);
                    for property in shape.properties {
                        self.merge_property(target, property);
                    }
                }
                merged
            },
            _ => None,
        }
    }

    fn merge_property(&self, shape: &mut ObjectType, property: Property) {
        let Some(existing) = shape.get(&property.name).cloned() else {
            shape.properties.push(property);
            return;
        };

        let ty = if self.is_assignable(&property.ty, &existing.ty) {
            property.ty
        } else {
            existing.ty
        };
        if let Some(slot) = shape.get_mut(&property.name) {
            slot.ty = ty;
            slot.optional = existing.optional && property.optional;
        }
    }

    /// Finds the first pair of intersection members that cannot both hold.
    ///
    /// Two distinct primitives conflict, and so do two shapes declaring the
    /// same property with types neither of which is assignable to the other.
    ///
    /// # Returns
    /// The conflicting pair as `(expected, found)`, if any.
    #[must_use]
    pub fn intersection_conflict(&self, members: &[Type]) -> Option<(Type, Type)> {
        for (i, first) in members.iter().enumerate() {
            for second in &members[i + 1..] {
                if let (Type::Primitive(a), Type::Primitive(b)) = (first, second)
                   && a != b
                {
                    return Some((first.clone(), second.clone()));
                }

                let (Some(a), Some(b)) = (self.shape_of(first), self.shape_of(second)) else {
                    continue;
                };
                for property in &a.properties {
                    if let Some(other) = b.get(&property.name)
                       && !self.is_assignable(&property.ty, &other.ty)
                       && !self.is_assignable(&other.ty, &property.ty)
                    {
                        return Some((other.ty.clone(), property.ty.clone()));
                    }
                }
            }
        }
        None
    }

    /// Looks up the type of a property access.
    ///
    /// # Returns
    /// - `Some(unknown)` when accessing a property of `unknown`.
    /// - For unions, the union of the property's types if every member has
    ///   the property.
    /// - For shapes, the declared type of the property.
    /// - `None` if the property does not exist.
    #[must_use]
    pub fn property_type(&self, ty: &Type, name: &str) -> Option<Type> {
        match ty {
            Type::Unknown => Some(Type::Unknown),
            Type::Union(members) => {
                members.iter()
                       .map(|m| self.property_type(m, name))
                       .collect::<Option<Vec<_>>>()
                       .map(Type::union)
            },
            _ => self.shape_of(ty)
                     .and_then(|shape| shape.get(name).map(|p| p.ty.clone())),
        }
    }

    /// Returns the function type a value of type `ty` can be called as.
    ///
    /// An intersection is callable through its first function member.
    #[must_use]
    pub fn callable(&self, ty: &Type) -> Option<FunctionType> {
        match ty {
            Type::Function(function) => Some(function.clone()),
            Type::Intersection(members) => members.iter().find_map(|m| self.callable(m)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile;

    fn env(source: &str) -> TypeEnv {
        let (env, diagnostics) = TypeEnv::from_program(&compile(source).unwrap());
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        env
    }

    fn named(name: &str) -> Type {
        Type::Named(name.to_string())
    }

    fn object(properties: &[(&str, Type)]) -> Type {
        Type::Object(ObjectType::new(properties.iter()
                                               .map(|(n, t)| Property::required(*n, t.clone()))
                                               .collect()))
    }

    #[test]
    fn union_as_source_needs_every_member() {
        let env = TypeEnv::default();
        let both = Type::union(vec![Type::STRING, Type::NUMBER]);

        assert!(env.is_assignable(&Type::STRING, &both));
        assert!(!env.is_assignable(&both, &Type::STRING));
        assert!(env.is_assignable(&both, &Type::union(vec![Type::NUMBER, Type::BOOLEAN, Type::STRING])));
    }

    #[test]
    fn recursive_interfaces_terminate() {
        let env = env("interface Node { value: number; next: Node }\n\
                       interface Link { value: number; next: Link }");

        assert!(env.is_assignable(&named("Node"), &named("Link")));
        assert!(env.is_assignable(&named("Link"), &named("Node")));
    }

    #[test]
    fn optional_properties() {
        let env = env("interface Opt { name: string; age?: number }");

        assert!(env.is_assignable(&object(&[("name", Type::STRING)]), &named("Opt")));
        assert!(!env.is_assignable(&object(&[("name", Type::STRING), ("age", Type::STRING)]),
                                   &named("Opt")));

        let shape = env.interface("Opt").unwrap().clone();
        let required = object(&[("name", Type::STRING), ("age", Type::NUMBER)]);
        assert!(!env.is_assignable(&Type::Object(shape), &required));
    }

    #[test]
    fn intersection_source_uses_merged_shape() {
        let env = env("interface A { a: string } interface B { b: number }");
        let both = Type::intersection(vec![named("A"), named("B")]);
        let wanted = object(&[("a", Type::STRING), ("b", Type::NUMBER)]);

        assert!(env.is_assignable(&both, &wanted));
        assert!(env.is_assignable(&wanted, &both));
        assert!(!env.is_assignable(&object(&[("a", Type::STRING)]), &both));
    }

    #[test]
    fn functions_are_contravariant_in_parameters() {
        let env = env("interface Animal { name: string } interface Dog { name: string; bark: string }");
        let takes_animal = Type::Function(FunctionType::new(vec![named("Animal")], Type::VOID));
        let takes_dog = Type::Function(FunctionType::new(vec![named("Dog")], Type::VOID));

        assert!(env.is_assignable(&takes_animal, &takes_dog));
        assert!(!env.is_assignable(&takes_dog, &takes_animal));

        let two = Type::Function(FunctionType::new(vec![Type::NUMBER, Type::NUMBER], Type::VOID));
        let one = Type::Function(FunctionType::new(vec![Type::NUMBER], Type::VOID));
        assert!(!env.is_assignable(&one, &two));
    }

    #[test]
    fn conflicting_intersection() {
        let env = env("interface A { x: string } interface B { x: number }");

        assert_eq!(env.intersection_conflict(&[named("A"), named("B")]),
                   Some((Type::NUMBER, Type::STRING)));
        assert_eq!(env.intersection_conflict(&[Type::STRING, Type::NUMBER]),
                   Some((Type::STRING, Type::NUMBER)));
        assert_eq!(env.intersection_conflict(&[Type::NUMBER, named("A")]), None);
    }

    #[test]
    fn property_on_union_requires_every_member() {
        let env = env("interface A { x: string; y: number } interface B { x: number }");
        let either = Type::union(vec![named("A"), named("B")]);

        assert_eq!(env.property_type(&either, "x"),
                   Some(Type::union(vec![Type::STRING, Type::NUMBER])));
        assert_eq!(env.property_type(&either, "y"), None);
    }
}
