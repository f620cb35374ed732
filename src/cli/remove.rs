use super::{open_mod_list, require_mod};
use dialoguer::Confirm;
use starmod::core::{ModError, ModResult};
use std::path::Path;

pub fn run(config: Option<&Path>, name: &str, yes: bool) -> ModResult<()> {
    let mut list = open_mod_list(config)?;
    require_mod(&list, name)?;

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove '{}' from the mod list?", name))
            .default(false)
            .interact()
            .map_err(|e| ModError::Config(format!("Failed to read input: {}", e)))?;

        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let installed = list
        .get_mod_by_name(name)
        .map(|m| m.installed)
        .unwrap_or(false);

    // Take the payload out of the game directory before forgetting the mod
    if installed {
        list.uninstall_mod(name)?;
        println!("✓ Removed {} from the game directory", name);
    }

    list.delete_mod(name)?;
    println!("✓ Removed {} from the mod list", name);

    Ok(())
}
