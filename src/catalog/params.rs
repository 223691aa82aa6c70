//! Shorthand constructors for catalog parameters.

use apphost_types::{Capabilities, TypeDesc, Value};

use super::enums::Enumeration;
use crate::format::Format;
use crate::resolve::Param;

pub fn text(name: &'static str) -> Param {
    Param::new(name, TypeDesc::str(), Format::Str)
}

/// `str | None`, defaulting to null.
pub fn maybe_text(name: &'static str) -> Param {
    Param::new(name, TypeDesc::optional(TypeDesc::str()), Format::Str).default(Value::Null)
}

pub fn switch(name: &'static str, default: bool) -> Param {
    Param::new(name, TypeDesc::bool(), Format::Bool).default(default)
}

pub fn number(name: &'static str) -> Param {
    Param::new(name, TypeDesc::int(), Format::Number)
}

pub fn maybe_number(name: &'static str) -> Param {
    Param::new(name, TypeDesc::optional(TypeDesc::int()), Format::Number).default(Value::Null)
}

pub fn choice(name: &'static str, e: Enumeration) -> Param {
    Param::new(name, TypeDesc::one_of(e.members), Format::Enum(e.name))
}

pub fn maybe_choice(name: &'static str, e: Enumeration) -> Param {
    Param::new(
        name,
        TypeDesc::optional(TypeDesc::one_of(e.members)),
        Format::Enum(e.name),
    )
    .default(Value::Null)
}

pub fn strings(name: &'static str) -> Param {
    Param::new(name, TypeDesc::seq(TypeDesc::str()), Format::StrArray)
}

pub fn maybe_strings(name: &'static str) -> Param {
    Param::new(
        name,
        TypeDesc::optional(TypeDesc::seq(TypeDesc::str())),
        Format::StrArray,
    )
    .default(Value::Null)
}

/// Resource handle rendered as its builder variable.
pub fn handle(name: &'static str, caps: Capabilities) -> Param {
    Param::new(name, TypeDesc::resource(caps), Format::Handle)
}

/// Resource handle of one concrete type, rendered as its builder variable.
pub fn typed_handle(name: &'static str, type_name: &str) -> Param {
    Param::new(name, TypeDesc::resource_type(type_name), Format::Handle)
}

/// Resource handle rendered as `<variable>.Resource`.
pub fn resource_of(name: &'static str, caps: Capabilities) -> Param {
    Param::new(name, TypeDesc::resource(caps), Format::ResourceOf)
}
