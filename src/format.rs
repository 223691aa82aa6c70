//! Rendering values as C# argument expressions.

use apphost_types::Value;
use base64::Engine;

/// How a bound value is rendered in the emitted program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `"text"`, or `(string?)null`.
    Str,
    /// `true` / `false`.
    Bool,
    /// Integer or floating-point literal.
    Number,
    /// `TypeName.Member` for a target enumeration.
    Enum(&'static str),
    /// `new string[] { "a", "b" }`.
    StrArray,
    /// The referenced resource's builder variable.
    Handle,
    /// The referenced resource's `.Resource` property.
    ResourceOf,
    /// `Convert.FromBase64String("...")`.
    Bytes,
    /// Certificate loaded from bytes or a file path, or a list of them.
    Certificate,
}

impl Format {
    /// Literal used when a value is absent and there is no default.
    pub fn null_literal(self) -> &'static str {
        match self {
            Format::Str => "(string?)null",
            _ => "null",
        }
    }
}

/// Render `value` with `rule`, falling back to `default` when the value is absent.
pub fn format(value: &Value, rule: Format, default: Option<&Value>) -> String {
    if value.is_null() {
        return match default {
            Some(d) if !d.is_null() => format(d, rule, None),
            _ => rule.null_literal().to_string(),
        };
    }

    match rule {
        Format::Str => quote(&plain(value)),
        Format::Bool => match value {
            Value::Bool(b) => b.to_string(),
            other => plain(other),
        },
        Format::Number => plain(value),
        Format::Enum(type_name) => format!("{type_name}.{}", plain(value)),
        Format::StrArray => match value {
            Value::List(items) | Value::Tuple(items) => {
                let items: Vec<String> = items.iter().map(|i| quote(&plain(i))).collect();
                format!("new string[] {{ {} }}", items.join(", "))
            }
            other => format!("new string[] {{ {} }}", quote(&plain(other))),
        },
        Format::Handle => match value {
            Value::Resource(r) => r.variable.clone(),
            other => plain(other),
        },
        Format::ResourceOf => match value {
            Value::Resource(r) => format!("{}.Resource", r.variable),
            other => plain(other),
        },
        Format::Bytes => base64_literal(value),
        Format::Certificate => certificate(value),
    }
}

fn certificate(value: &Value) -> String {
    match value {
        Value::Bytes(_) => format!(
            "X509CertificateLoader.LoadCertificate({})",
            base64_literal(value)
        ),
        Value::List(items) | Value::Tuple(items) => {
            let items: Vec<String> = items.iter().map(certificate).collect();
            format!("new List<X509Certificate2> {{ {} }}", items.join(", "))
        }
        other => format!(
            "X509CertificateLoader.LoadCertificateFromFile({})",
            quote(&plain(other))
        ),
    }
}

fn base64_literal(value: &Value) -> String {
    let encoded = match value {
        Value::Bytes(data) => base64::engine::general_purpose::STANDARD.encode(data),
        other => plain(other),
    };
    format!("Convert.FromBase64String({})", quote(&encoded))
}

/// Unquoted textual form of a scalar.
fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Resource(r) => r.variable.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// C# regular string literal.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
