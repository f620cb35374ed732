use crate::core::path::{config_file, ensure_dir};
use crate::core::{ModError, ModResult};
use crate::files::{SignatureEntry, SignatureTable};
use crate::modlist::ListPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the persisted mod list (defaults to platform-specific data directory)
    ///
    /// Default locations:
    /// - Windows: %APPDATA%\starmod
    /// - Linux: ~/.local/share/starmod
    /// - macOS: ~/Library/Application Support/starmod
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,

    /// The game's mod directory; payloads are installed into it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_dir: Option<String>,

    /// Whether the list lock also blocks adding and deleting mods
    #[serde(default)]
    pub lock_gates_membership: bool,

    /// Whether hiding a mod is saved immediately
    #[serde(default = "default_true")]
    pub persist_hidden: bool,

    /// Whether a refresh replaces the in-memory list with the stored one
    #[serde(default = "default_true")]
    pub refresh_replaces_list: bool,

    /// Additional archive signatures
    /// Example: [{ extension: ".pak", magic: [0x53, 0x42, 0x41, 0x73] }]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_signatures: Vec<SignatureEntry>,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            game_dir: None,
            lock_gates_membership: false,
            persist_hidden: true,
            refresh_replaces_list: true,
            extra_signatures: Vec::new(),
        }
    }
}

impl Config {
    /// Load config from platform-specific config directory, creating default if it doesn't exist
    ///
    /// Config locations:
    /// - Windows: %APPDATA%\starmod\config.yaml
    /// - Linux: ~/.config/starmod/config.yaml
    /// - macOS: ~/Library/Application Support/starmod/config.yaml
    pub fn load() -> ModResult<Self> {
        Self::load_from(&config_file()?)
    }

    /// Load config from an explicit path, creating a default file if it doesn't exist
    pub fn load_from(path: &Path) -> ModResult<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ModError::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> ModResult<()> {
        if let Some(dir) = path.parent() {
            ensure_dir(dir)?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| ModError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)?;
        Ok(())
    }

    /// Get the data directory path
    pub fn get_data_dir(&self) -> ModResult<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            Ok(PathBuf::from(dir))
        } else {
            crate::core::path::data_dir()
        }
    }

    pub fn get_game_dir(&self) -> Option<PathBuf> {
        self.game_dir.as_ref().map(PathBuf::from)
    }

    /// Built-in archive signatures merged with `extra_signatures`.
    /// Fails on an entry that could not tell archives apart.
    pub fn signature_table(&self) -> ModResult<SignatureTable> {
        SignatureTable::builtin().with_entries(self.extra_signatures.iter().cloned())
    }

    pub fn list_policy(&self) -> ListPolicy {
        ListPolicy {
            lock_gates_membership: self.lock_gates_membership,
            persist_hidden: self.persist_hidden,
            refresh_replaces_list: self.refresh_replaces_list,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(!config.lock_gates_membership);
        assert!(config.persist_hidden);
        assert!(config.refresh_replaces_list);
        assert_eq!(config.list_policy(), ListPolicy::default());
    }

    #[test]
    fn test_load_from_creates_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.yaml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");

        let config = Config {
            data_dir: Some("/data/starmod".to_string()),
            game_dir: Some("/games/starbound/mods".to_string()),
            lock_gates_membership: true,
            extra_signatures: vec![SignatureEntry::new(".pak", b"SBAsset6")],
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.get_game_dir(), Some(PathBuf::from("/games/starbound/mods")));
        assert!(loaded.signature_table().unwrap().lookup(".pak").is_some());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "persist_hidden: false\nextra_signatures:\n  - extension: pak\n    magic: [83, 66]\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(!config.persist_hidden);
        assert!(config.refresh_replaces_list);
        assert_eq!(config.signature_table().unwrap().lookup(".pak").unwrap().magic, vec![83, 66]);
    }

    #[test]
    fn test_signature_without_magic_is_a_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "extra_signatures:\n  - extension: pak\n    magic: []\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(matches!(config.signature_table(), Err(ModError::Config(_))));
    }

    #[test]
    fn test_invalid_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "persist_hidden: [not, a, bool]").unwrap();

        assert!(matches!(Config::load_from(&path), Err(ModError::Config(_))));
    }
}
