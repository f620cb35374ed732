//! Blocking file work moved off the calling thread.
//!
//! Verification, checksums and package loading run on tokio's blocking pool
//! with bounded concurrency. Results come back in input order so the single
//! owner of the mod list can apply them serially.

use crate::core::{ModError, ModResult};
use crate::files::{checksum, SignatureTable};
use crate::package::{Mod, ModLoader};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Default number of files processed at once
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Cooperative cancellation flag shared between a caller and running work
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Run `work` over every path on the blocking pool, at most `max_concurrent`
/// at a time. Paths not started before cancellation report `Cancelled`; a
/// panic in `work` is reported as `Task` for its path.
pub async fn run_blocking_each<T, F>(
    paths: Vec<PathBuf>,
    max_concurrent: usize,
    cancel: &CancelToken,
    work: F,
) -> Vec<(PathBuf, ModResult<T>)>
where
    T: Send + 'static,
    F: Fn(usize, &Path) -> ModResult<T> + Send + Sync + 'static,
{
    let work = Arc::new(work);
    let max_concurrent = max_concurrent.max(1);
    let mut slots: Vec<Option<ModResult<T>>> = paths.iter().map(|_| None).collect();
    let mut join_set = JoinSet::new();

    for (index, path) in paths.iter().enumerate() {
        if join_set.len() >= max_concurrent {
            // Wait for one task to complete before adding another
            collect_next(&mut join_set, &mut slots).await;
        }

        if cancel.is_cancelled() {
            tracing::debug!(remaining = paths.len() - index, "Cancelled, not starting remaining files");
            break;
        }

        let work = Arc::clone(&work);
        let path = path.clone();
        join_set.spawn_blocking(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| work(index, &path)))
                .unwrap_or_else(|payload| {
                    Err(ModError::Task(format!(
                        "{} panicked: {}",
                        path.display(),
                        panic_message(payload.as_ref())
                    )))
                });
            (index, result)
        });
    }

    while !join_set.is_empty() {
        collect_next(&mut join_set, &mut slots).await;
    }

    paths
        .into_iter()
        .zip(slots)
        .map(|(path, slot)| {
            let result = slot.unwrap_or_else(|| {
                Err(ModError::Cancelled(format!("{} was not processed", path.display())))
            });
            (path, result)
        })
        .collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "unknown panic"
    }
}

async fn collect_next<T: 'static>(
    join_set: &mut JoinSet<(usize, ModResult<T>)>,
    slots: &mut [Option<ModResult<T>>],
) {
    match join_set.join_next().await {
        Some(Ok((index, result))) => slots[index] = Some(result),
        Some(Err(e)) => tracing::error!(error = %e, "Background file task failed"),
        None => {}
    }
}

/// Load candidate packages. The i-th path is offered order `first_order + i`.
pub async fn load_candidates(
    loader: Arc<dyn ModLoader>,
    paths: Vec<PathBuf>,
    first_order: usize,
    cancel: &CancelToken,
) -> Vec<(PathBuf, ModResult<Mod>)> {
    run_blocking_each(paths, DEFAULT_MAX_CONCURRENT, cancel, move |index, path| {
        loader.load(path, first_order + index)
    })
    .await
}

/// Classify many files at once. Success carries the matched extension.
pub async fn verify_many(
    signatures: SignatureTable,
    paths: Vec<PathBuf>,
    cancel: &CancelToken,
) -> Vec<(PathBuf, ModResult<String>)> {
    run_blocking_each(paths, DEFAULT_MAX_CONCURRENT, cancel, move |_, path| {
        signatures.check(path).map(|entry| entry.extension.clone())
    })
    .await
}

/// Checksum many files at once
pub async fn checksum_many(
    paths: Vec<PathBuf>,
    cancel: &CancelToken,
) -> Vec<(PathBuf, ModResult<u64>)> {
    run_blocking_each(paths, DEFAULT_MAX_CONCURRENT, cancel, |_, path| checksum(path)).await
}
