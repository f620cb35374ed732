use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A managed mod: one row of the load-order list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mod {
    /// Unique key, stable across sessions
    pub internal_name: String,
    /// Position in load priority, 0 is loaded first
    pub order: usize,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub installed: bool,
    pub source_path: PathBuf,
    /// Adler-32 of the package file, when it is a file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<u64>,
}

impl Mod {
    pub fn new(internal_name: impl Into<String>, source_path: impl Into<PathBuf>, order: usize) -> Self {
        Self {
            internal_name: internal_name.into(),
            order,
            hidden: false,
            installed: false,
            source_path: source_path.into(),
            checksum: None,
        }
    }

    pub fn with_checksum(mut self, checksum: u64) -> Self {
        self.checksum = Some(checksum);
        self
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Whether the mod takes part in the active load order
    pub fn is_active(&self) -> bool {
        self.installed && !self.hidden
    }
}
