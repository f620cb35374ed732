use super::{open_mod_list, require_mod};
use starmod::core::ModResult;
use std::path::Path;

pub fn run(config: Option<&Path>, name: &str, amount: i64) -> ModResult<()> {
    let mut list = open_mod_list(config)?;
    require_mod(&list, name)?;

    let before = list.index_of(name);
    list.move_mod(name, amount)?;
    let after = list.index_of(name);

    match (before, after) {
        (Some(from), Some(to)) if from != to => {
            println!("✓ Moved {} from position {} to {}", name, from, to)
        }
        _ => println!("{} stays at its position", name),
    }

    Ok(())
}
