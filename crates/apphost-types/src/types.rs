//! Structural type descriptors

use std::fmt;

use crate::value::{Capabilities, Value};

/// Leaf kinds a [`TypeDesc::Primitive`] can require.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primitive {
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    /// Any resource handle carrying all of the given capabilities.
    Resource(Capabilities),
    /// A resource handle of exactly this target type name.
    ResourceType(String),
}

/// One declared field of a [`TypeDesc::Record`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub desc: TypeDesc,
    pub required: bool,
}

impl Field {
    pub fn required(name: impl Into<String>, desc: TypeDesc) -> Self {
        Self {
            name: name.into(),
            desc,
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>, desc: TypeDesc) -> Self {
        Self {
            name: name.into(),
            desc,
            required: false,
        }
    }
}

/// Describes the acceptable shape of a [`Value`].
///
/// Descriptors are immutable and are built once per declaration, then shared
/// by every call that resolves against them.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDesc {
    Primitive(Primitive),
    /// Value must equal one of the listed values.
    Literal(Vec<Value>),
    /// Fixed-arity tuple; each position has its own descriptor.
    Tuple(Vec<TypeDesc>),
    /// Homogeneous list. Tuples, maps and strings never match.
    Sequence(Box<TypeDesc>),
    /// Homogeneous map; keys are matched as string values.
    Mapping(Box<TypeDesc>, Box<TypeDesc>),
    /// Named fields; unknown keys are ignored.
    Record(Vec<Field>),
    Union(Vec<TypeDesc>),
    None,
}

impl TypeDesc {
    pub fn bool() -> Self {
        TypeDesc::Primitive(Primitive::Bool)
    }

    pub fn int() -> Self {
        TypeDesc::Primitive(Primitive::Int)
    }

    pub fn float() -> Self {
        TypeDesc::Primitive(Primitive::Float)
    }

    pub fn str() -> Self {
        TypeDesc::Primitive(Primitive::Str)
    }

    pub fn bytes() -> Self {
        TypeDesc::Primitive(Primitive::Bytes)
    }

    pub fn resource(capabilities: Capabilities) -> Self {
        TypeDesc::Primitive(Primitive::Resource(capabilities))
    }

    pub fn resource_type(name: impl Into<String>) -> Self {
        TypeDesc::Primitive(Primitive::ResourceType(name.into()))
    }

    /// `Literal` over string members, the usual encoding of target enums.
    pub fn one_of(members: &[&str]) -> Self {
        TypeDesc::Literal(members.iter().map(|m| Value::from(*m)).collect())
    }

    /// Matches only `true`; used for switch-style options.
    pub fn flag() -> Self {
        TypeDesc::Literal(vec![Value::Bool(true)])
    }

    pub fn tuple(items: impl IntoIterator<Item = TypeDesc>) -> Self {
        TypeDesc::Tuple(items.into_iter().collect())
    }

    pub fn seq(inner: TypeDesc) -> Self {
        TypeDesc::Sequence(Box::new(inner))
    }

    pub fn mapping(key: TypeDesc, value: TypeDesc) -> Self {
        TypeDesc::Mapping(Box::new(key), Box::new(value))
    }

    pub fn record(fields: impl IntoIterator<Item = Field>) -> Self {
        TypeDesc::Record(fields.into_iter().collect())
    }

    pub fn union(alternatives: impl IntoIterator<Item = TypeDesc>) -> Self {
        TypeDesc::Union(alternatives.into_iter().collect())
    }

    /// `inner | None`
    pub fn optional(inner: TypeDesc) -> Self {
        TypeDesc::Union(vec![inner, TypeDesc::None])
    }

    /// True when `None` is an accepted value.
    pub fn is_nullable(&self) -> bool {
        match self {
            TypeDesc::None => true,
            TypeDesc::Literal(values) => values.iter().any(Value::is_null),
            TypeDesc::Union(alts) => alts.iter().any(TypeDesc::is_nullable),
            _ => false,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Bool => f.write_str("bool"),
            Primitive::Int => f.write_str("int"),
            Primitive::Float => f.write_str("float"),
            Primitive::Str => f.write_str("str"),
            Primitive::Bytes => f.write_str("bytes"),
            Primitive::Resource(caps) => write!(f, "{caps}"),
            Primitive::ResourceType(name) => f.write_str(name),
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Primitive(p) => write!(f, "{p}"),
            TypeDesc::Literal(values) => {
                let items: Vec<String> = values.iter().map(Value::to_string).collect();
                write!(f, "Literal[{}]", items.join(", "))
            }
            TypeDesc::Tuple(items) => {
                let items: Vec<String> = items.iter().map(TypeDesc::to_string).collect();
                write!(f, "tuple[{}]", items.join(", "))
            }
            TypeDesc::Sequence(inner) => write!(f, "list[{inner}]"),
            TypeDesc::Mapping(key, value) => write!(f, "map[{key}, {value}]"),
            TypeDesc::Record(fields) => {
                let items: Vec<String> = fields
                    .iter()
                    .map(|field| {
                        let marker = if field.required { "" } else { "?" };
                        format!("{}{}: {}", field.name, marker, field.desc)
                    })
                    .collect();
                write!(f, "{{{}}}", items.join(", "))
            }
            TypeDesc::Union(alts) => {
                let items: Vec<String> = alts.iter().map(TypeDesc::to_string).collect();
                f.write_str(&items.join(" | "))
            }
            TypeDesc::None => f.write_str("None"),
        }
    }
}
