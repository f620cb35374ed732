use super::open_mod_list;
use starmod::core::{ModError, ModResult};
use starmod::package::Mod;
use std::path::Path;

pub fn run(config: Option<&Path>, json: bool) -> ModResult<()> {
    let list = open_mod_list(config)?;

    if json {
        let output = serde_json::to_string_pretty(list.mods())
            .map_err(|e| ModError::Store(format!("Failed to serialize mod list: {}", e)))?;
        println!("{}", output);
        return Ok(());
    }

    print_mod_list(list.mods());
    Ok(())
}

fn print_mod_list(mods: &[Mod]) {
    println!("Load order:");

    if mods.is_empty() {
        println!("  (none)");
        return;
    }

    for m in mods {
        let status = if m.installed { "✓" } else { "✗" };
        let hidden = if m.hidden { " (hidden)" } else { "" };
        println!("  [{}] {} {}{}", m.order, status, m.internal_name, hidden);
    }

    let installed = mods.iter().filter(|m| m.installed).count();
    let active = mods.iter().filter(|m| m.is_active()).count();
    println!();
    println!("{} mod(s), {} installed, {} active", mods.len(), installed, active);
}
