//! JSON manifests describing a whole AppHost program.
//!
//! ```json
//! {
//!   "settings": { "sdk-version": "13.0.1.0" },
//!   "options": { "disable_dashboard": true },
//!   "resources": [
//!     { "factory": "add_postgres", "name": "pg", "named": { "pg_admin": true } },
//!     { "factory": "add_database", "name": "orders", "parent": "pg" },
//!     { "factory": "add_project", "name": "api", "args": ["../Api/Api.csproj"],
//!       "calls": [{ "method": "with_reference", "args": [{ "$ref": "orders" }] }] }
//!   ]
//! }
//! ```
//!
//! Arrays become lists and objects become maps, except for three markers:
//! `{"$tuple": [..]}` for tuples, `{"$ref": "name"}` for an earlier resource
//! and `{"$bytes": "<base64>"}` for byte strings.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use apphost_types::Value;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use thiserror::Error;
use tracing::debug;

use crate::composition::Composition;
use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::resolve::Args;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid $bytes value: {0}")]
    Bytes(#[from] base64::DecodeError),

    #[error("malformed '{marker}' marker: {reason}")]
    Marker { marker: String, reason: String },
}

/// Top-level manifest document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub settings: GeneratorConfig,
    /// `DistributedApplicationOptions` passed to `CreateBuilder`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Json>>,
    #[serde(default)]
    pub resources: Vec<ResourceSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceSpec {
    pub factory: String,
    pub name: String,
    /// Resource the factory is invoked on, for child factories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub args: Vec<Json>,
    #[serde(default)]
    pub named: Map<String, Json>,
    #[serde(default)]
    pub calls: Vec<CallSpec>,
}

/// A fluent method call applied after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CallSpec {
    pub method: String,
    #[serde(default)]
    pub args: Vec<Json>,
    #[serde(default)]
    pub named: Map<String, Json>,
}

impl FromStr for Manifest {
    type Err = ManifestError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

impl Manifest {
    pub fn from_path(path: &Path) -> std::result::Result<Self, ManifestError> {
        let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        text.parse()
    }

    /// Replay the manifest into a fresh composition.
    pub fn compose(&self) -> Result<Composition> {
        let mut composition = Composition::with_config(self.settings.clone());
        if let Some(options) = &self.options {
            let options = convert(&Json::Object(options.clone()), &composition)?;
            composition = composition.with_options(options)?;
        }

        for spec in &self.resources {
            let mut args = build_args(&spec.args, &spec.named, &composition)?;
            args.prepend(spec.name.as_str());

            let resource = match &spec.parent {
                Some(parent) => {
                    let parent = composition
                        .get(parent)
                        .cloned()
                        .ok_or_else(|| Error::UnknownResource(parent.clone()))?;
                    composition.add_child(&parent, &spec.factory, args)?
                }
                None => composition.add(&spec.factory, args)?,
            };

            for call in &spec.calls {
                let args = build_args(&call.args, &call.named, &composition)?;
                composition.invoke(&resource, &call.method, args)?;
            }
            debug!(resource = %spec.name, calls = spec.calls.len(), "manifest resource applied");
        }
        Ok(composition)
    }
}

fn build_args(
    positional: &[Json],
    named: &Map<String, Json>,
    composition: &Composition,
) -> Result<Args> {
    let mut args = Args::new();
    for value in positional {
        args = args.arg(convert(value, composition)?);
    }
    for (key, value) in named {
        args = args.kwarg(key.as_str(), convert(value, composition)?);
    }
    Ok(args)
}

/// Convert a JSON value, resolving `$ref` markers against `composition`.
pub fn convert(json: &Json, composition: &Composition) -> Result<Value> {
    let value = match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or_default()),
        },
        Json::String(s) => Value::String(s.clone()),
        Json::Array(items) => Value::List(convert_all(items, composition)?),
        Json::Object(map) => match marker(map) {
            Some(("$tuple", Json::Array(items))) => Value::Tuple(convert_all(items, composition)?),
            Some(("$ref", Json::String(name))) => composition
                .get(name)
                .map(Value::from)
                .ok_or_else(|| Error::UnknownResource(name.clone()))?,
            Some(("$bytes", Json::String(encoded))) => Value::Bytes(
                base64::engine::general_purpose::STANDARD
                    .decode(encoded)
                    .map_err(ManifestError::from)?,
            ),
            Some((marker, _)) => {
                return Err(ManifestError::Marker {
                    marker: marker.to_string(),
                    reason: "unsupported marker or payload".to_string(),
                }
                .into())
            }
            None => Value::Map(
                map.iter()
                    .map(|(k, v)| -> Result<(String, Value)> {
                        Ok((k.clone(), convert(v, composition)?))
                    })
                    .collect::<Result<_>>()?,
            ),
        },
    };
    Ok(value)
}

fn convert_all(items: &[Json], composition: &Composition) -> Result<Vec<Value>> {
    items.iter().map(|item| convert(item, composition)).collect()
}

/// A single-entry object whose key starts with `$`.
fn marker(map: &Map<String, Json>) -> Option<(&str, &Json)> {
    let mut entries = map.iter();
    match (entries.next(), entries.next()) {
        (Some((key, value)), None) if key.starts_with('$') => Some((key.as_str(), value)),
        _ => None,
    }
}
