//! Generator settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_SDK_VERSION: &str = "13.0.1.0";
pub const DEFAULT_FILE_NAME: &str = "apphost.cs";

/// Where and against which SDK version the program is generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GeneratorConfig {
    /// Version used for the `#:sdk` line and every `#:package` declaration.
    pub sdk_version: String,
    /// Output directory; `<cwd>/.aspire/apphost` when unset.
    pub output_dir: Option<PathBuf>,
    pub file_name: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            sdk_version: DEFAULT_SDK_VERSION.to_string(),
            output_dir: None,
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Fails when the output directory is unset and the working directory
    /// cannot be read.
    pub fn output_dir(&self) -> Result<PathBuf> {
        match &self.output_dir {
            Some(dir) => Ok(dir.clone()),
            None => {
                let cwd = std::env::current_dir().map_err(|source| Error::Io {
                    path: PathBuf::from("."),
                    source,
                })?;
                Ok(cwd.join(".aspire").join("apphost"))
            }
        }
    }

    /// Full path of the generated file.
    pub fn output_path(&self) -> Result<PathBuf> {
        Ok(self.output_dir()?.join(&self.file_name))
    }
}
