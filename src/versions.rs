//! Application name and version.

use serde::Deserialize;
use std::path::Path;

use crate::error::Result;
use crate::fs_utils::read_json_file;

const UNKNOWN_NAME: &str = "unknown-application";
const UNKNOWN_VERSION: &str = "0.0.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
}

#[derive(Deserialize)]
struct Manifest {
    name: Option<String>,
    version: Option<String>,
}

impl AppInfo {
    /// Name and version this binary was built with
    pub fn builtin() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Read `name`/`version` from a JSON manifest such as a `package.json`.
    ///
    /// Missing fields fall back to `unknown-application` / `0.0.0`.
    pub fn from_manifest(path: &Path) -> Result<Self> {
        let manifest: Manifest = read_json_file(path)?;
        Ok(Self {
            name: manifest.name.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            version: manifest
                .version
                .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
        })
    }

    /// Default log file name, `<name>-<version>.log`
    pub fn log_file_name(&self) -> String {
        format!("{}-{}.log", self.name, self.version)
    }
}
