use crate::core::error::{ModError, ModResult};
use std::path::{Path, PathBuf};

/// Get the starmod home directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\starmod
/// - Linux: ~/.config/starmod
/// - macOS: ~/Library/Application Support/starmod
pub fn starmod_home() -> ModResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ModError::Path("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("starmod"))
}

/// Get the data directory holding the persisted mod list
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\starmod
/// - Linux: ~/.local/share/starmod
/// - macOS: ~/Library/Application Support/starmod
pub fn data_dir() -> ModResult<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| ModError::Path("Could not determine data directory".to_string()))?;
    Ok(data_dir.join("starmod"))
}

/// Get the config file path
pub fn config_file() -> ModResult<PathBuf> {
    Ok(starmod_home()?.join("config.yaml"))
}

/// Get the persisted mod list file inside a data directory
pub fn mod_list_file(data_dir: &Path) -> PathBuf {
    data_dir.join("mods.yaml")
}

/// Get the directory a mod's payload is installed to
pub fn install_dir(game_dir: &Path, internal_name: &str) -> PathBuf {
    game_dir.join(internal_name)
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> ModResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Lowercase extension of a file name, including the leading dot
pub fn dotted_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
}
