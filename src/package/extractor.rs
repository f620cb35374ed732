use crate::core::{ModError, ModResult};
use crate::files::delete_tree;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Unpacks zip payloads into a staging directory before they are copied
/// into the game directory
pub struct PackageExtractor {
    staging_root: PathBuf,
}

impl PackageExtractor {
    /// Create a new PackageExtractor
    pub fn new(staging_root: PathBuf) -> Self {
        Self { staging_root }
    }

    /// Staging directory used for a given mod
    pub fn staging_dir(&self, name: &str) -> PathBuf {
        self.staging_root.join(format!(".tmp-{}", name))
    }

    /// Extract a zip archive for mod `name`.
    /// Returns the staging directory holding the archive contents.
    pub fn extract_zip(&self, archive_path: &Path, name: &str) -> ModResult<PathBuf> {
        let staging = self.staging_dir(name);
        let result = self.extract_into(archive_path, &staging);

        // Cleanup staging directory on error
        if result.is_err() {
            if let Err(e) = self.clear(name) {
                tracing::warn!(path = %staging.display(), error = %e, "Failed to clean staging directory");
            }
        }

        result.map(|()| staging)
    }

    /// Remove the staging directory for `name`, then the staging root once
    /// nothing else is staged in it
    pub fn clear(&self, name: &str) -> ModResult<()> {
        delete_tree(&self.staging_dir(name))?;

        match fs::read_dir(&self.staging_root) {
            Ok(mut entries) => {
                if entries.next().is_none() {
                    fs::remove_dir(&self.staging_root)
                        .map_err(|e| ModError::io(&self.staging_root, e))?;
                }
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ModError::io(&self.staging_root, e)),
        }
    }

    fn extract_into(&self, archive_path: &Path, staging: &Path) -> ModResult<()> {
        let file = File::open(archive_path).map_err(|e| ModError::io(archive_path, e))?;
        let mut archive = ZipArchive::new(file)
            .map_err(|e| ModError::Archive(format!("Invalid zip {}: {}", archive_path.display(), e)))?;

        // Clean up any existing staging dir
        delete_tree(staging)?;
        fs::create_dir_all(staging)?;

        archive
            .extract(staging)
            .map_err(|e| ModError::Archive(format!("Extract failed: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn write_zip(path: &Path) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        zip.start_file("pak.modinfo", FileOptions::default()).unwrap();
        zip.write_all(b"{\"name\":\"cool\"}").unwrap();
        zip.add_directory("items/", FileOptions::default()).unwrap();
        zip.start_file("items/sword.item", FileOptions::default()).unwrap();
        zip.write_all(b"sword").unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn test_extract_zip() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("cool.zip");
        write_zip(&archive);

        let extractor = PackageExtractor::new(temp.path().join("staging"));
        let staged = extractor.extract_zip(&archive, "cool").unwrap();

        assert_eq!(staged, extractor.staging_dir("cool"));
        assert_eq!(fs::read_to_string(staged.join("items/sword.item")).unwrap(), "sword");
    }

    #[test]
    fn test_extract_invalid_zip_cleans_up() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("broken.zip");
        fs::write(&archive, [0x50, 0x4B, 0x03, 0x04, 0xFF]).unwrap();

        let extractor = PackageExtractor::new(temp.path().join("staging"));
        let result = extractor.extract_zip(&archive, "broken");

        assert!(matches!(result, Err(ModError::Archive(_))));
        assert!(!extractor.staging_dir("broken").exists());
        assert!(!temp.path().join("staging").exists());
    }

    #[test]
    fn test_clear_keeps_root_while_others_are_staged() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("cool.zip");
        write_zip(&archive);
        let root = temp.path().join("staging");
        let extractor = PackageExtractor::new(root.clone());

        extractor.extract_zip(&archive, "one").unwrap();
        extractor.extract_zip(&archive, "two").unwrap();

        extractor.clear("one").unwrap();
        assert!(!extractor.staging_dir("one").exists());
        assert!(extractor.staging_dir("two").is_dir());

        extractor.clear("two").unwrap();
        assert!(!root.exists());

        // Clearing again is harmless
        extractor.clear("two").unwrap();
    }

    #[test]
    fn test_extract_missing_file() {
        let temp = TempDir::new().unwrap();
        let extractor = PackageExtractor::new(temp.path().join("staging"));
        let result = extractor.extract_zip(&temp.path().join("nonexistent.zip"), "x");
        assert!(result.unwrap_err().is_not_found());
    }
}
