use crate::core::{ModError, ModResult};
use crate::files::{checksum, SignatureTable};
use crate::package::record::Mod;
use std::fs;
use std::path::Path;

/// Turns a candidate package on disk into a [`Mod`] record
pub trait ModLoader: Send + Sync {
    /// Load the package at `path`, giving it load-order position `order`
    fn load(&self, path: &Path, order: usize) -> ModResult<Mod>;

    /// Cheap pre-check used when files are dragged over the window
    fn supports(&self, path: &Path) -> bool;
}

/// Loads archive packages (zip, rar, 7z and any configured extras)
#[derive(Debug, Clone, Default)]
pub struct ArchiveModLoader {
    signatures: SignatureTable,
}

impl ArchiveModLoader {
    pub fn new(signatures: SignatureTable) -> Self {
        Self { signatures }
    }
}

impl ModLoader for ArchiveModLoader {
    fn load(&self, path: &Path, order: usize) -> ModResult<Mod> {
        let metadata = fs::metadata(path).map_err(|e| ModError::io(path, e))?;
        if metadata.is_dir() {
            return Err(ModError::FormatMismatch(format!(
                "{} is a directory, not a package archive",
                path.display()
            )));
        }

        self.signatures.check(path)?;

        let internal_name = internal_name_for(path)?;
        let checksum = checksum(path)?;

        tracing::debug!(name = %internal_name, path = %path.display(), "Loaded mod");

        Ok(Mod::new(internal_name, path, order).with_checksum(checksum))
    }

    fn supports(&self, path: &Path) -> bool {
        self.signatures.supports(path)
    }
}

/// Internal name of a package: its file name without the extension
pub fn internal_name_for(path: &Path) -> ModResult<String> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::trim)
        .unwrap_or_default();

    if stem.is_empty() {
        return Err(ModError::FormatMismatch(format!(
            "Cannot derive a mod name from {}",
            path.display()
        )));
    }

    Ok(stem.to_string())
}
