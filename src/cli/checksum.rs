use starmod::core::ModResult;
use starmod::files::checksum;
use std::path::Path;

pub fn run(file: &Path) -> ModResult<()> {
    let sum = checksum(file)?;
    println!("{:08x}  {}", sum, file.display());
    Ok(())
}
