use crate::core::path::{ensure_dir, install_dir};
use crate::core::{ModError, ModResult};
use crate::files::{copy_tree, delete_tree, undo_copy, CopyReport, SignatureTable};
use crate::package::extractor::PackageExtractor;
use crate::package::record::Mod;
use std::fs;
use std::path::PathBuf;

/// What an install put on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    pub target: PathBuf,
    pub copied: CopyReport,
}

/// Copies mod payloads into (and removes them from) the game's mod directory
pub struct ModInstaller {
    game_dir: PathBuf,
    signatures: SignatureTable,
    extractor: PackageExtractor,
}

impl ModInstaller {
    /// Create a new installer targeting `game_dir`
    pub fn new(game_dir: PathBuf, signatures: SignatureTable) -> Self {
        let extractor = PackageExtractor::new(game_dir.join(".starmod-staging"));
        Self {
            game_dir,
            signatures,
            extractor,
        }
    }

    /// Where a mod's payload lives once installed
    pub fn target_dir(&self, record: &Mod) -> PathBuf {
        install_dir(&self.game_dir, &record.internal_name)
    }

    /// Install a mod's payload.
    ///
    /// Archive sources are verified again first, since the file may have
    /// changed since it was added. Zip payloads are unpacked; other archive
    /// types and directory sources are copied as-is. Existing files in the
    /// target are never overwritten, and a copy that fails partway leaves
    /// the target as it was.
    pub fn install(&self, record: &Mod) -> ModResult<Installation> {
        let source = record.source_path();
        let metadata = fs::metadata(source).map_err(|e| ModError::io(source, e))?;
        let target = self.target_dir(record);

        ensure_dir(&self.game_dir)?;

        let copied = if metadata.is_dir() {
            copy_tree(source, &target)?
        } else {
            let signature = self.signatures.check(source)?;

            if signature.extension == ".zip" {
                let staged = self.extractor.extract_zip(source, &record.internal_name)?;
                let copied = copy_tree(&staged, &target);
                if let Err(e) = self.extractor.clear(&record.internal_name) {
                    tracing::warn!(path = %staged.display(), error = %e, "Failed to clean staging directory");
                }
                copied?
            } else {
                let file_name = source.file_name().ok_or_else(|| {
                    ModError::Path(format!("No file name in {}", source.display()))
                })?;
                copy_tree(source, &target.join(file_name))?
            }
        };

        tracing::info!(
            name = %record.internal_name,
            target = %target.display(),
            files = copied.files_copied,
            "Installed mod"
        );
        Ok(Installation { target, copied })
    }

    /// Take back exactly what `installation` created. Files that were in
    /// the target beforehand stay.
    pub fn rollback(&self, installation: &Installation) -> ModResult<()> {
        undo_copy(&installation.copied)?;
        tracing::info!(target = %installation.target.display(), "Rolled back install");
        Ok(())
    }

    /// Remove a mod's payload. Removing a payload that is not there succeeds.
    pub fn uninstall(&self, record: &Mod) -> ModResult<()> {
        let target = self.target_dir(record);
        delete_tree(&target)?;
        tracing::info!(name = %record.internal_name, target = %target.display(), "Uninstalled mod");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;
    use tempfile::TempDir;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn write_zip(path: &Path) {
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        zip.start_file("pak.modinfo", FileOptions::default()).unwrap();
        zip.write_all(b"{}").unwrap();
        zip.start_file("items/sword.item", FileOptions::default()).unwrap();
        zip.write_all(b"sword").unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn test_install_and_uninstall_zip() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("cool.zip");
        write_zip(&archive);
        let game = temp.path().join("game/mods");

        let installer = ModInstaller::new(game.clone(), SignatureTable::builtin());
        let record = Mod::new("cool", &archive, 0);

        let installation = installer.install(&record).unwrap();
        let target = installation.target;
        assert_eq!(target, game.join("cool"));
        assert_eq!(installation.copied.files_copied, 2);
        assert_eq!(fs::read_to_string(target.join("items/sword.item")).unwrap(), "sword");
        assert!(!installer.extractor.staging_dir("cool").exists());
        // Nothing but the payload is left in the game directory
        assert!(!game.join(".starmod-staging").exists());

        installer.uninstall(&record).unwrap();
        assert!(!target.exists());
        // Second uninstall is a no-op
        installer.uninstall(&record).unwrap();
    }

    #[test]
    fn test_install_rar_copies_archive() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("big.rar");
        fs::write(&archive, [0x52, 0x61, 0x72, 0x21, 0x1A, 0x07, 0x00, 0x01]).unwrap();

        let installer = ModInstaller::new(temp.path().join("game"), SignatureTable::builtin());
        let installation = installer.install(&Mod::new("big", &archive, 0)).unwrap();

        assert!(installation.target.join("big.rar").is_file());
    }

    #[test]
    fn test_install_directory_source() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("unpacked");
        fs::create_dir_all(source.join("items")).unwrap();
        fs::write(source.join("items/axe.item"), "axe").unwrap();

        let installer = ModInstaller::new(temp.path().join("game"), SignatureTable::builtin());
        let installation = installer.install(&Mod::new("unpacked", &source, 0)).unwrap();

        assert!(installation.target.join("items/axe.item").is_file());
    }

    #[test]
    fn test_install_rejects_tampered_archive() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("evil.zip");
        fs::write(&archive, b"MZ not a zip").unwrap();

        let installer = ModInstaller::new(temp.path().join("game"), SignatureTable::builtin());
        let err = installer.install(&Mod::new("evil", &archive, 0)).unwrap_err();

        assert!(err.is_format_mismatch());
        assert!(!temp.path().join("game/evil").exists());
    }

    #[test]
    fn test_rollback_keeps_files_already_in_target() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("tools.rar");
        fs::write(&archive, [0x52, 0x61, 0x72, 0x21, 0x1A, 0x07, 0x00, 0x01]).unwrap();
        let game = temp.path().join("game");
        fs::create_dir_all(game.join("tools")).unwrap();
        fs::write(game.join("tools/user_save.dat"), "mine").unwrap();

        let installer = ModInstaller::new(game.clone(), SignatureTable::builtin());
        let installation = installer.install(&Mod::new("tools", &archive, 0)).unwrap();
        assert!(game.join("tools/tools.rar").is_file());

        installer.rollback(&installation).unwrap();

        assert!(!game.join("tools/tools.rar").exists());
        assert_eq!(fs::read_to_string(game.join("tools/user_save.dat")).unwrap(), "mine");
    }

    #[test]
    fn test_rollback_removes_target_it_created() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("cool.zip");
        write_zip(&archive);
        let game = temp.path().join("game");

        let installer = ModInstaller::new(game.clone(), SignatureTable::builtin());
        let installation = installer.install(&Mod::new("cool", &archive, 0)).unwrap();
        installer.rollback(&installation).unwrap();

        assert!(!game.join("cool").exists());
    }

    #[test]
    fn test_failed_install_leaves_target_as_found() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("armory");
        fs::create_dir_all(source.join("items")).unwrap();
        fs::write(source.join("a.item"), "a").unwrap();
        fs::write(source.join("items/axe.item"), "axe").unwrap();
        let game = temp.path().join("game");
        fs::create_dir_all(game.join("armory")).unwrap();
        // Blocks the payload's items/ directory, so the copy stops partway
        fs::write(game.join("armory/items"), "user file").unwrap();

        let installer = ModInstaller::new(game.clone(), SignatureTable::builtin());
        assert!(installer.install(&Mod::new("armory", &source, 0)).is_err());

        assert!(!game.join("armory/a.item").exists());
        assert_eq!(fs::read_to_string(game.join("armory/items")).unwrap(), "user file");

        // Once the obstacle is gone a retry installs everything
        fs::remove_file(game.join("armory/items")).unwrap();
        let installation = installer.install(&Mod::new("armory", &source, 0)).unwrap();
        assert_eq!(installation.copied.files_copied, 2);
    }
}
