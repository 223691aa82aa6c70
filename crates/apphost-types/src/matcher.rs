//! Structural matching of values against descriptors.
//!
//! [`matches`] is the only predicate overload resolution uses. [`explain`]
//! walks the same rules but reports where a value first diverges from a
//! descriptor, for diagnostics.

use thiserror::Error;

use crate::types::{Primitive, TypeDesc};
use crate::value::Value;

/// First position at which a value failed to match.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("at {path}: expected {expected}, got {actual}")]
pub struct Mismatch {
    pub path: String,
    pub expected: String,
    pub actual: String,
}

/// True when `value` satisfies `desc`. Never fails.
pub fn matches(value: &Value, desc: &TypeDesc) -> bool {
    match desc {
        TypeDesc::Primitive(kind) => matches_primitive(value, kind),
        TypeDesc::Literal(members) => members.iter().any(|m| m == value),
        TypeDesc::Tuple(items) => match value {
            Value::Tuple(values) => {
                values.len() == items.len()
                    && values.iter().zip(items).all(|(v, d)| matches(v, d))
            }
            _ => false,
        },
        TypeDesc::Sequence(inner) => match value {
            Value::List(values) => values.iter().all(|v| matches(v, inner)),
            _ => false,
        },
        TypeDesc::Mapping(key, inner) => match value {
            Value::Map(entries) => entries
                .iter()
                .all(|(k, v)| matches(&Value::String(k.clone()), key) && matches(v, inner)),
            _ => false,
        },
        TypeDesc::Record(fields) => match value {
            Value::Map(_) => fields.iter().all(|field| match value.get(&field.name) {
                Some(v) => matches(v, &field.desc),
                None => !field.required,
            }),
            _ => false,
        },
        TypeDesc::Union(alts) => alts.iter().any(|alt| matches(value, alt)),
        TypeDesc::None => value.is_null(),
    }
}

fn matches_primitive(value: &Value, kind: &Primitive) -> bool {
    match (value, kind) {
        (Value::Bool(_), Primitive::Bool) => true,
        (Value::Int(_), Primitive::Int) => true,
        (Value::Float(_), Primitive::Float) => true,
        (Value::String(_), Primitive::Str) => true,
        (Value::Bytes(_), Primitive::Bytes) => true,
        (Value::Resource(r), Primitive::Resource(caps)) => r.capabilities.contains(*caps),
        (Value::Resource(r), Primitive::ResourceType(name)) => &r.type_name == name,
        _ => false,
    }
}

/// Describe why `value` does not satisfy `desc`, or `None` when it does.
pub fn explain(value: &Value, desc: &TypeDesc) -> Option<Mismatch> {
    explain_at("$", value, desc)
}

fn explain_at(path: &str, value: &Value, desc: &TypeDesc) -> Option<Mismatch> {
    let mismatch = || Mismatch {
        path: path.to_string(),
        expected: desc.to_string(),
        actual: value.kind().to_string(),
    };

    match (desc, value) {
        (TypeDesc::Tuple(items), Value::Tuple(values)) => {
            if values.len() != items.len() {
                return Some(Mismatch {
                    path: path.to_string(),
                    expected: desc.to_string(),
                    actual: format!("tuple of {}", values.len()),
                });
            }
            values
                .iter()
                .zip(items)
                .enumerate()
                .find_map(|(i, (v, d))| explain_at(&format!("{path}[{i}]"), v, d))
        }
        (TypeDesc::Sequence(inner), Value::List(values)) => values
            .iter()
            .enumerate()
            .find_map(|(i, v)| explain_at(&format!("{path}[{i}]"), v, inner)),
        (TypeDesc::Mapping(key, inner), Value::Map(entries)) => {
            entries.iter().find_map(|(k, v)| {
                let key_path = format!("{path}.{k}");
                explain_at(&key_path, &Value::String(k.clone()), key)
                    .or_else(|| explain_at(&key_path, v, inner))
            })
        }
        (TypeDesc::Record(fields), Value::Map(_)) => fields.iter().find_map(|field| {
            let field_path = format!("{path}.{}", field.name);
            match value.get(&field.name) {
                Some(v) => explain_at(&field_path, v, &field.desc),
                None if field.required => Some(Mismatch {
                    path: field_path,
                    expected: field.desc.to_string(),
                    actual: "missing".to_string(),
                }),
                None => None,
            }
        }),
        // A union only reports itself; descending would pick an arbitrary branch.
        _ if matches(value, desc) => None,
        _ => Some(mismatch()),
    }
}
