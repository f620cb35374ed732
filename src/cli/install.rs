use super::{open_mod_list, require_mod};
use starmod::core::ModResult;
use std::path::Path;

pub fn run(config: Option<&Path>, name: &str) -> ModResult<()> {
    let mut list = open_mod_list(config)?;
    require_mod(&list, name)?;

    if list.get_mod_by_name(name).map(|m| m.installed).unwrap_or(false) {
        println!("{} is already installed", name);
        return Ok(());
    }

    println!("Installing {}", name);
    list.install_mod(name)?;
    println!("✓ Installed {}", name);

    Ok(())
}

pub fn run_uninstall(config: Option<&Path>, name: &str) -> ModResult<()> {
    let mut list = open_mod_list(config)?;
    require_mod(&list, name)?;

    if !list.get_mod_by_name(name).map(|m| m.installed).unwrap_or(false) {
        println!("{} is not installed", name);
        return Ok(());
    }

    list.uninstall_mod(name)?;
    println!("✓ Uninstalled {}", name);

    Ok(())
}
