//! Error types for composition and generation.

use std::path::PathBuf;

use thiserror::Error;

use crate::manifest::ManifestError;
use crate::resolve::ResolveError;

/// Errors raised while composing or building an AppHost program.
#[derive(Debug, Error)]
pub enum Error {
    /// A resource name contains characters other than ASCII alphanumerics and hyphens.
    #[error("invalid name '{0}': only alphanumeric characters and hyphens are allowed")]
    InvalidName(String),

    /// A resource with this name already exists in the composition.
    #[error("duplicate resource name '{0}'")]
    DuplicateName(String),

    /// Overload resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Keyword options left over after every known option was consumed.
    #[error("unexpected keyword arguments for '{operation}': {keys:?}")]
    UnexpectedOptions {
        operation: String,
        keys: Vec<String>,
    },

    /// The resource type has no such factory, method or option.
    #[error("'{resource}' has no operation named '{operation}'")]
    UnknownOperation { resource: String, operation: String },

    /// A referenced resource does not exist.
    #[error("unknown resource '{0}'")]
    UnknownResource(String),

    /// The composition has already been built.
    #[error("composition is closed; no further changes are accepted")]
    Closed,

    /// Resolving the output location or writing the program failed.
    #[error("i/o error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
