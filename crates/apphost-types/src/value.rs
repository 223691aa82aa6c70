//! Dynamic argument values

use std::fmt;

/// Capability set carried by a resource handle.
///
/// Each bit corresponds to one resource protocol of the target SDK
/// (`IResourceWithEnvironment`, `IResourceWithEndpoints`, ...). Every handle
/// carries [`Capabilities::RESOURCE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities(u32);

impl Capabilities {
    pub const RESOURCE: Self = Self(1 << 0);
    pub const CONNECTION_STRING: Self = Self(1 << 1);
    pub const ENVIRONMENT: Self = Self(1 << 2);
    pub const ARGS: Self = Self(1 << 3);
    pub const ENDPOINTS: Self = Self(1 << 4);
    pub const SERVICE_DISCOVERY: Self = Self(1 << 5);
    pub const WAIT_SUPPORT: Self = Self(1 << 6);
    pub const COMPUTE: Self = Self(1 << 7);
    pub const COMPUTE_ENVIRONMENT: Self = Self(1 << 8);
    pub const PROBES: Self = Self(1 << 9);
    pub const CONTAINER_FILES: Self = Self(1 << 10);
    pub const CONTAINER_FILES_DESTINATION: Self = Self(1 << 11);

    const NAMES: [(Self, &'static str); 12] = [
        (Self::RESOURCE, "Resource"),
        (Self::CONNECTION_STRING, "ResourceWithConnectionString"),
        (Self::ENVIRONMENT, "ResourceWithEnvironment"),
        (Self::ARGS, "ResourceWithArgs"),
        (Self::ENDPOINTS, "ResourceWithEndpoints"),
        (Self::SERVICE_DISCOVERY, "ResourceWithServiceDiscovery"),
        (Self::WAIT_SUPPORT, "ResourceWithWaitSupport"),
        (Self::COMPUTE, "ComputeResource"),
        (Self::COMPUTE_ENVIRONMENT, "ComputeEnvironmentResource"),
        (Self::PROBES, "ResourceWithProbes"),
        (Self::CONTAINER_FILES, "ResourceWithContainerFiles"),
        (Self::CONTAINER_FILES_DESTINATION, "ContainerFilesDestinationResource"),
    ];

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// True when every capability in `other` is also in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The base capability is implied once anything more specific is listed.
        let specific: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(cap, _)| *cap != Self::RESOURCE && self.contains(*cap))
            .map(|(_, name)| *name)
            .collect();
        if specific.is_empty() {
            f.write_str("Resource")
        } else {
            f.write_str(&specific.join(" + "))
        }
    }
}

/// Handle to a resource created earlier in the same composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    /// Variable the resource is bound to in the emitted program.
    pub variable: String,
    /// Target SDK type name, e.g. `ContainerResource`.
    pub type_name: String,
    pub capabilities: Capabilities,
}

/// A dynamic argument value passed to an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),

    /// Fixed-arity positional group.
    Tuple(Vec<Value>),
    /// Homogeneous sequence.
    List(Vec<Value>),
    /// String-keyed record, in insertion order.
    Map(Vec<(String, Value)>),

    Resource(ResourceRef),
}

impl Value {
    /// Build a map value from key/value pairs.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(data.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Look up a key in a map value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the value's kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "None",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::Tuple(_) => "tuple",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Resource(_) => "resource",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(s) => write!(f, "'{s}'"),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Value::Tuple(items) => {
                f.write_str("(")?;
                write_joined(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Value::List(items) => {
                f.write_str("[")?;
                write_joined(f, items)?;
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "'{k}': {v}")?;
                }
                f.write_str("}")
            }
            Value::Resource(r) => write!(f, "<{} {}>", r.type_name, r.variable),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

// ============================================================================
// From implementations for primitives
// ============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self { Value::Bool(v) }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self { Value::Int(i64::from(v)) }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self { Value::Int(i64::from(v)) }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self { Value::Int(i64::from(v)) }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self { Value::Int(v) }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self { Value::Float(v) }
}

impl From<String> for Value {
    fn from(v: String) -> Self { Value::String(v) }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self { Value::String(v.to_string()) }
}

impl From<ResourceRef> for Value {
    fn from(v: ResourceRef) -> Self { Value::Resource(v) }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(x) => x.into(),
            None => Value::Null,
        }
    }
}

// ============================================================================
// Tuple implementations
// ============================================================================

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for Value {
    fn from((a, b): (A, B)) -> Self {
        Value::Tuple(vec![a.into(), b.into()])
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>> From<(A, B, C)> for Value {
    fn from((a, b, c): (A, B, C)) -> Self {
        Value::Tuple(vec![a.into(), b.into(), c.into()])
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>, D: Into<Value>> From<(A, B, C, D)>
    for Value
{
    fn from((a, b, c, d): (A, B, C, D)) -> Self {
        Value::Tuple(vec![a.into(), b.into(), c.into(), d.into()])
    }
}
