use std::fmt;

/// The primitive types of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `string`
    String,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `void`; also the type of `undefined` and `null`.
    Void,
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
                        Self::String => "string",
                        Self::Number => "number",
                        Self::Boolean => "boolean",
                        Self::Void => "void",
                    })
    }
}

/// A static type.
///
/// Types compare structurally: two `Object` types with the same properties
/// are equal no matter where they were written. `Named` references are only
/// handles; what they stand for lives in the
/// [`TypeEnv`](crate::interpreter::types::env::TypeEnv).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// A primitive type.
    Primitive(Primitive),
    /// A reference to a declared interface.
    Named(String),
    /// A structural object type.
    Object(ObjectType),
    /// A function type.
    Function(FunctionType),
    /// A union of two or more types.
    Union(Vec<Self>),
    /// An intersection of two or more types.
    Intersection(Vec<Self>),
    /// The type of unannotated parameters and of expressions whose type could
    /// not be determined. Assignable to and from everything.
    Unknown,
}

impl Type {
    /// `string`
    pub const STRING: Self = Self::Primitive(Primitive::String);
    /// `number`
    pub const NUMBER: Self = Self::Primitive(Primitive::Number);
    /// `boolean`
    pub const BOOLEAN: Self = Self::Primitive(Primitive::Boolean);
    /// `void`
    pub const VOID: Self = Self::Primitive(Primitive::Void);

    /// Builds a union from a list of types.
    ///
    /// Nested unions are flattened and duplicates removed. A union containing
    /// `unknown` is `unknown`; a single remaining member is returned as is,
    /// and an empty list is `void`.
    ///
    /// # Example
    /// ```
    /// use tslite::interpreter::types::core::Type;
    ///
    /// let ty = Type::union(vec![Type::STRING,
    ///                           Type::union(vec![Type::NUMBER, Type::STRING])]);
    ///
    /// assert_eq!(ty.to_string(), "string | number");
    /// assert_eq!(Type::union(vec![Type::NUMBER]), Type::NUMBER);
    /// ```
    #[must_use]
    pub fn union(types: Vec<Self>) -> Self {
        let mut members: Vec<Self> = Vec::new();
        for ty in types {
            match ty {
                Self::Unknown => return Self::Unknown,
                Self::Union(inner) => {
                    for member in inner {
                        if !members.contains(&member) {
                            members.push(member);
                        }
                    }
                },
                other => {
                    if !members.contains(&other) {
                        members.push(other);
                    }
                },
            }
        }

        match members.len() {
            0 => Self::VOID,
            1 => members.pop().unwrap_or(Self::VOID),
            _ => Self::Union(members),
        }
    }

    /// Builds an intersection, flattening nested intersections.
    #[must_use]
    pub fn intersection(types: Vec<Self>) -> Self {
        let mut members = Vec::new();
        for ty in types {
            match ty {
                Self::Intersection(inner) => members.extend(inner),
                other => members.push(other),
            }
        }

        if members.len() == 1 {
            return members.pop().unwrap_or(Self::Unknown);
        }
        Self::Intersection(members)
    }

    /// Returns `true` for the `unknown` type.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Returns `true` if the type is exactly the given primitive.
    #[must_use]
    pub fn is_primitive(&self, primitive: Primitive) -> bool {
        matches!(self, Self::Primitive(p) if *p == primitive)
    }

    /// Wraps function members and unions in parentheses where precedence
    /// requires it.
    fn fmt_member(&self, f: &mut fmt::Formatter<'_>, inside_intersection: bool) -> fmt::Result {
        match self {
            Self::Function(_) => write!(f, "({self})"),
            Self::Union(_) if inside_intersection => write!(f, "({self})"),
            _ => write!(f, "{self}"),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{p}"),
            Self::Named(name) => f.write_str(name),
            Self::Object(object) => write!(f, "{object}"),
            Self::Function(function) => write!(f, "{function}"),
            Self::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    member.fmt_member(f, false)?;
                }
                Ok(())
            },
            Self::Intersection(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" & ")?;
                    }
                    member.fmt_member(f, true)?;
                }
                Ok(())
            },
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// One property of an object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name.
    pub name:     String,
    /// Property type.
    pub ty:       Type,
    /// Whether the property may be missing.
    pub optional: bool,
}

impl Property {
    /// Creates a required property.
    #[must_use]
    pub fn required(name: impl Into<String>, ty: Type) -> Self {
        Self { name: name.into(),
               ty,
               optional: false }
    }
}

/// A structural object type: an ordered list of properties.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectType {
    /// The properties, in declaration order. Names are unique.
    pub properties: Vec<Property>,
}

impl ObjectType {
    /// Creates an object type from its properties.
    #[must_use]
    pub const fn new(properties: Vec<Property>) -> Self {
        Self { properties }
    }

    /// Looks up a property by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Looks up a property by name for modification.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.name == name)
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.properties.is_empty() {
            return f.write_str("{}");
        }
        f.write_str("{ ")?;
        for (i, property) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            let marker = if property.optional { "?" } else { "" };
            write!(f, "{}{marker}: {}", property.name, property.ty)?;
        }
        f.write_str(" }")
    }
}

/// A function type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionType {
    /// Parameter types, in order.
    pub params:   Vec<Type>,
    /// How many leading parameters a call must supply.
    pub required: usize,
    /// Whether the last parameter accepts any number of arguments.
    pub variadic: bool,
    /// Return type.
    pub ret:      Box<Type>,
}

impl FunctionType {
    /// Creates a function type whose parameters are all required.
    #[must_use]
    pub fn new(params: Vec<Type>, ret: Type) -> Self {
        Self { required: params.len(),
               params,
               variadic: false,
               ret: Box::new(ret) }
    }

    /// Returns `true` if a call with `count` arguments has a valid arity.
    #[must_use]
    pub const fn accepts_arity(&self, count: usize) -> bool {
        count >= self.required && (self.variadic || count <= self.params.len())
    }

    /// Describes the accepted argument counts, e.g. `2`, `1-2` or `at least 1`.
    #[must_use]
    pub fn arity(&self) -> String {
        if self.variadic {
            format!("at least {}", self.required)
        } else if self.required == self.params.len() {
            self.required.to_string()
        } else {
            format!("{}-{}", self.required, self.params.len())
        }
    }

    /// Returns the parameter type an argument at `index` is checked against.
    #[must_use]
    pub fn param(&self, index: usize) -> Option<&Type> {
        self.params
            .get(index)
            .or_else(|| if self.variadic { self.params.last() } else { None })
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        let last = self.params.len().saturating_sub(1);
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if self.variadic && i == last {
                write!(f, "...{param}[]")?;
            } else if i >= self.required {
                write!(f, "{param}?")?;
            } else {
                write!(f, "{param}")?;
            }
        }
        write!(f, ") => {}", self.ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_flattens_and_absorbs_unknown() {
        let nested = Type::union(vec![Type::STRING, Type::union(vec![Type::NUMBER, Type::BOOLEAN])]);
        assert_eq!(nested, Type::Union(vec![Type::STRING, Type::NUMBER, Type::BOOLEAN]));

        assert_eq!(Type::union(vec![Type::STRING, Type::Unknown]), Type::Unknown);
        assert_eq!(Type::union(Vec::new()), Type::VOID);
    }

    #[test]
    fn display_with_precedence() {
        let ty = Type::union(vec![Type::STRING,
                                  Type::intersection(vec![Type::NUMBER, Type::Named("Baz".into())])]);
        assert_eq!(ty.to_string(), "string | number & Baz");

        let ty = Type::intersection(vec![Type::union(vec![Type::STRING, Type::NUMBER]),
                                         Type::Named("Baz".into())]);
        assert_eq!(ty.to_string(), "(string | number) & Baz");

        let ty = Type::union(vec![Type::Function(FunctionType::new(vec![], Type::VOID)), Type::STRING]);
        assert_eq!(ty.to_string(), "(() => void) | string");
    }

    #[test]
    fn object_display() {
        let object = ObjectType::new(vec![Property::required("name", Type::STRING),
                                          Property { name:     "age".into(),
                                                     ty:       Type::NUMBER,
                                                     optional: true, }]);
        assert_eq!(object.to_string(), "{ name: string; age?: number }");
        assert_eq!(ObjectType::default().to_string(), "{}");
    }

    #[test]
    fn arity() {
        let f = FunctionType { params:   vec![Type::NUMBER, Type::STRING],
                               required: 1,
                               variadic: false,
                               ret:      Box::new(Type::VOID), };
        assert!(f.accepts_arity(1));
        assert!(f.accepts_arity(2));
        assert!(!f.accepts_arity(3));
        assert_eq!(f.arity(), "1-2");
        assert_eq!(f.to_string(), "(number, string?) => void");

        let log = FunctionType { params:   vec![Type::Unknown],
                                 required: 0,
                                 variadic: true,
                                 ret:      Box::new(Type::VOID), };
        assert!(log.accepts_arity(5));
        assert_eq!(log.param(3), Some(&Type::Unknown));
        assert_eq!(log.to_string(), "(...unknown[]) => void");
    }
}
