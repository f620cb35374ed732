use super::{load_config, require_mod};
use starmod::core::path::install_dir;
use starmod::core::{ModError, ModResult};
use starmod::files::{is_manifest_candidate, list_dir, read_to_string};
use starmod::modlist::ModList;
use std::collections::BTreeSet;
use std::path::Path;

/// List the top-level entries of an installed mod, marking manifest
/// candidates. With `show`, print the text of each candidate.
pub fn run(config: Option<&Path>, name: &str, show: bool) -> ModResult<()> {
    let config = load_config(config)?;
    let list = ModList::from_config(&config)?;
    require_mod(&list, name)?;

    let game_dir = config.get_game_dir().ok_or_else(|| {
        ModError::Config("game_dir is not set; cannot locate installed files".to_string())
    })?;
    let dir = install_dir(&game_dir, name);
    if !dir.is_dir() {
        return Err(ModError::NotFound(format!("{} is not installed", name)));
    }

    let mut entries = BTreeSet::new();
    list_dir(&dir, &mut entries)?;

    println!("Files in {}:", dir.display());
    for entry in &entries {
        let file_name = entry
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if entry.is_dir() {
            println!("  {}/", file_name);
            continue;
        }

        if !is_manifest_candidate(&file_name) {
            println!("  {}", file_name);
            continue;
        }

        println!("  {} (manifest)", file_name);
        if show {
            match read_to_string(entry) {
                Ok(text) => {
                    for line in text.lines() {
                        println!("    | {}", line);
                    }
                }
                Err(e) => println!("    could not read: {}", e),
            }
        }
    }

    Ok(())
}
