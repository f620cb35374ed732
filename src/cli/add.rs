use super::open_mod_list;
use indicatif::{ProgressBar, ProgressStyle};
use starmod::core::ModResult;
use starmod::tasks::CancelToken;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub async fn run(config: Option<&Path>, files: Vec<PathBuf>) -> ModResult<()> {
    let mut list = open_mod_list(config)?;

    // Ctrl-C stops the batch after the files already in flight
    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message(format!("Verifying {} file(s)...", files.len()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = list.add_mods(files, &cancel).await;

    spinner.finish_and_clear();
    watcher.abort();

    let report = result?;

    for name in &report.added {
        println!("  ✓ {}", name);
    }
    for (path, error) in &report.rejected {
        println!("  ✗ {} ({})", path.display(), error);
    }

    println!("✓ Added {} mod(s)", report.added.len());
    if !report.rejected.is_empty() {
        println!("  {} file(s) rejected", report.rejected.len());
    }

    Ok(())
}
