pub mod add;
pub mod checksum;
pub mod files;
pub mod hide;
pub mod install;
pub mod list;
pub mod remove;
pub mod reorder;
pub mod verify;

use starmod::config::Config;
use starmod::core::{ModError, ModResult};
use starmod::modlist::ModList;
use std::path::Path;

/// Load the config from `--config` or the platform default
pub fn load_config(path: Option<&Path>) -> ModResult<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

pub fn open_mod_list(config: Option<&Path>) -> ModResult<ModList> {
    ModList::from_config(&load_config(config)?)
}

/// The library ignores unknown names; on the command line that is a mistake
pub fn require_mod(list: &ModList, name: &str) -> ModResult<()> {
    if list.get_mod_by_name(name).is_none() {
        return Err(ModError::NotFound(format!(
            "Mod '{}' is not in the list",
            name
        )));
    }
    Ok(())
}
