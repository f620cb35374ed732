use super::load_config;
use starmod::core::{ModError, ModResult};
use starmod::tasks::{verify_many, CancelToken};
use std::path::{Path, PathBuf};

pub async fn run(config: Option<&Path>, files: Vec<PathBuf>) -> ModResult<()> {
    let config = load_config(config)?;

    println!("Verifying {} file(s)...", files.len());

    let results = verify_many(config.signature_table()?, files, &CancelToken::new()).await;

    let mut failed = 0;
    for (path, result) in &results {
        match result {
            Ok(extension) => println!("  ✓ {} ({})", path.display(), extension),
            Err(e) => {
                failed += 1;
                println!("  ❌ {}: {}", path.display(), e);
            }
        }
    }

    if failed > 0 {
        return Err(ModError::FormatMismatch(format!(
            "Verification failed for {} file(s)",
            failed
        )));
    }

    println!("✓ All files verified successfully");
    Ok(())
}
