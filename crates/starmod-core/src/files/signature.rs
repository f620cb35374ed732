//! Archive signature verification.
//!
//! A dropped package is only trusted when its leading bytes match the magic
//! number registered for its extension. Signatures come from
//! <http://www.garykessler.net/library/file_sigs.html>.

use crate::core::path::dotted_extension;
use crate::core::{ModError, ModResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const SIG_SEVENZIP: &[u8] = &[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C];
const SIG_RAR: &[u8] = &[0x52, 0x61, 0x72, 0x21, 0x1A, 0x07, 0x00];
const SIG_ZIP: &[u8] = &[0x50, 0x4B, 0x03, 0x04];

/// One row of the signature table: an extension and the bytes its files start with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureEntry {
    /// Lowercase extension with a leading dot, e.g. `.zip`
    pub extension: String,
    pub magic: Vec<u8>,
}

impl SignatureEntry {
    pub fn new(extension: &str, magic: &[u8]) -> Self {
        let extension = extension.trim().to_lowercase();
        let extension = if extension.starts_with('.') {
            extension
        } else {
            format!(".{}", extension)
        };
        Self {
            extension,
            magic: magic.to_vec(),
        }
    }

    /// Whether `bytes` begins with this entry's magic number
    pub fn matches(&self, bytes: &[u8]) -> bool {
        bytes.len() >= self.magic.len() && bytes[..self.magic.len()] == self.magic[..]
    }
}

/// Extension to magic-number lookup table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureTable {
    entries: Vec<SignatureEntry>,
}

impl Default for SignatureTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SignatureTable {
    /// The archive formats mods are distributed in: 7z, rar and zip
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                SignatureEntry::new(".7z", SIG_SEVENZIP),
                SignatureEntry::new(".rar", SIG_RAR),
                SignatureEntry::new(".zip", SIG_ZIP),
            ],
        }
    }

    /// Merge extra entries into the table. An entry for an extension that is
    /// already present replaces the existing one.
    ///
    /// Entries without magic bytes would match every file, so they are
    /// refused, as are entries without an extension.
    pub fn with_entries(
        mut self,
        extra: impl IntoIterator<Item = SignatureEntry>,
    ) -> ModResult<Self> {
        for entry in extra {
            let entry = SignatureEntry::new(&entry.extension, &entry.magic);
            if entry.extension.len() < 2 {
                return Err(ModError::Config(
                    "Signature entry has no extension".to_string(),
                ));
            }
            if entry.magic.is_empty() {
                return Err(ModError::Config(format!(
                    "Signature for '{}' has no magic bytes",
                    entry.extension
                )));
            }
            match self
                .entries
                .iter_mut()
                .find(|e| e.extension == entry.extension)
            {
                Some(existing) => *existing = entry,
                None => self.entries.push(entry),
            }
        }
        Ok(self)
    }

    pub fn entries(&self) -> &[SignatureEntry] {
        &self.entries
    }

    pub fn lookup(&self, extension: &str) -> Option<&SignatureEntry> {
        let extension = extension.to_lowercase();
        self.entries.iter().find(|e| e.extension == extension)
    }

    /// Whether the file's extension is one the table knows about.
    /// Does not touch the file.
    pub fn supports(&self, path: &Path) -> bool {
        dotted_extension(path)
            .map(|ext| self.lookup(&ext).is_some())
            .unwrap_or(false)
    }

    /// Classify `path` against the table.
    ///
    /// Returns the matching entry, `FormatMismatch` when the extension is
    /// unknown, the file is too short or any leading byte differs, and
    /// `NotFound`/`Io` when the file cannot be read.
    pub fn check(&self, path: &Path) -> ModResult<&SignatureEntry> {
        let extension = dotted_extension(path).ok_or_else(|| {
            ModError::FormatMismatch(format!("Unsupported extension: {}", path.display()))
        })?;

        let entry = self.lookup(&extension).ok_or_else(|| {
            ModError::FormatMismatch(format!(
                "Unsupported extension '{}': {}",
                extension,
                path.display()
            ))
        })?;

        let file = File::open(path).map_err(|e| ModError::io(path, e))?;
        let mut head = Vec::with_capacity(entry.magic.len());
        file.take(entry.magic.len() as u64)
            .read_to_end(&mut head)
            .map_err(|e| ModError::io(path, e))?;

        if head.len() < entry.magic.len() {
            return Err(ModError::FormatMismatch(format!(
                "{} is shorter than the {} signature",
                path.display(),
                entry.extension
            )));
        }

        if !entry.matches(&head) {
            return Err(ModError::FormatMismatch(format!(
                "{} does not carry a {} signature",
                path.display(),
                entry.extension
            )));
        }

        Ok(entry)
    }

    /// Swallow-and-log form of [`check`](Self::check).
    pub fn verify(&self, path: &Path) -> bool {
        match self.check(path) {
            Ok(_) => {
                tracing::info!(path = %path.display(), "File verified");
                true
            }
            Err(e @ ModError::FormatMismatch(_)) => {
                tracing::debug!(path = %path.display(), error = %e, "Signature rejected");
                false
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Could not read file signature");
                false
            }
        }
    }
}

/// Verify `path` against the built-in signature table
pub fn verify(path: &Path) -> bool {
    SignatureTable::builtin().verify(path)
}
