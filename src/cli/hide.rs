use super::{open_mod_list, require_mod};
use starmod::core::ModResult;
use std::path::Path;

pub fn run(config: Option<&Path>, name: &str, hidden: bool) -> ModResult<()> {
    let mut list = open_mod_list(config)?;
    require_mod(&list, name)?;

    if hidden {
        list.hide_mod(name)?;
        println!("✓ {} is hidden", name);
    } else {
        list.unhide_mod(name)?;
        println!("✓ {} is visible", name);
    }

    Ok(())
}
