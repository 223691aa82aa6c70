//! Handles to resources created in a composition.

use apphost_types::{ResourceRef, Value};

use crate::catalog::ResourceKind;
use crate::error::{Error, Result};

/// A resource declared in the generated program.
///
/// Handles are cheap to clone and can be passed wherever a resource argument
/// is expected; they convert into [`Value::Resource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    name: String,
    variable: String,
    kind: ResourceKind,
}

impl Resource {
    pub(crate) fn new(name: &str, kind: ResourceKind) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            variable: variable_name(name)?,
            kind,
        })
    }

    /// Name as given by the caller.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variable bound in the emitted program.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn to_ref(&self) -> ResourceRef {
        ResourceRef {
            variable: self.variable.clone(),
            type_name: self.kind.type_name().to_string(),
            capabilities: self.kind.capabilities(),
        }
    }
}

impl From<&Resource> for Value {
    fn from(resource: &Resource) -> Self {
        Value::Resource(resource.to_ref())
    }
}

impl From<Resource> for Value {
    fn from(resource: Resource) -> Self {
        Value::from(&resource)
    }
}

/// `my-db` becomes `my_db`. Anything outside `[A-Za-z0-9-]` is rejected.
pub fn variable_name(name: &str) -> Result<String> {
    let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if !valid {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(name.replace('-', "_"))
}
