//! Recursive copy/delete and small whole-file helpers.

use crate::core::{ModError, ModResult};
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Outcome of a [`copy_tree`] call
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CopyReport {
    pub files_copied: usize,
    pub dirs_created: usize,
    /// Entries left alone: existing destinations and links that leave the tree
    pub skipped: Vec<PathBuf>,
    /// Every file and directory this copy brought into existence, in
    /// creation order
    pub created: Vec<PathBuf>,
}

/// Copy a file, or a whole directory tree, to `dest`.
///
/// Existing destination files are never overwritten; directories are merged.
/// Symbolic links are followed only when their target lies inside the tree
/// being copied. A copy that fails partway removes what it had created, so
/// `dest` is left as it was found.
pub fn copy_tree(src: &Path, dest: &Path) -> ModResult<CopyReport> {
    let mut report = CopyReport::default();
    let result = copy_tree_inner(src, dest, &mut report);

    if let Err(e) = result {
        tracing::error!(
            src = %src.display(),
            dest = %dest.display(),
            error = %e,
            "Copying file/folder failed"
        );
        if let Err(undo) = undo_copy(&report) {
            tracing::error!(dest = %dest.display(), error = %undo, "Could not remove partial copy");
        }
        return Err(e);
    }

    tracing::debug!(
        src = %src.display(),
        dest = %dest.display(),
        files = report.files_copied,
        skipped = report.skipped.len(),
        "Copied tree"
    );
    Ok(report)
}

fn copy_tree_inner(src: &Path, dest: &Path, report: &mut CopyReport) -> ModResult<()> {
    let metadata = fs::metadata(src).map_err(|e| ModError::io(src, e))?;

    if !metadata.is_dir() {
        return copy_file(src, dest, report);
    }

    let root = fs::canonicalize(src).map_err(|e| ModError::io(src, e))?;
    let mut visiting = vec![root.clone()];
    copy_dir(&root, &root, dest, &mut visiting, report)
}

/// Remove what a copy created, newest first.
///
/// Directories are only removed once empty, so anything placed in them by
/// someone else survives.
pub fn undo_copy(report: &CopyReport) -> ModResult<()> {
    for path in report.created.iter().rev() {
        let metadata = match fs::symlink_metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(ModError::io(path, e)),
        };

        if metadata.is_dir() {
            if fs::read_dir(path)?.next().is_some() {
                tracing::debug!(path = %path.display(), "Keeping non-empty directory");
                continue;
            }
            fs::remove_dir(path).map_err(|e| ModError::io(path, e))?;
        } else {
            fs::remove_file(path).map_err(|e| ModError::io(path, e))?;
        }
    }
    Ok(())
}

/// `create_dir_all` that records each directory it had to make
fn create_dirs(path: &Path, report: &mut CopyReport) -> ModResult<()> {
    let mut missing = Vec::new();
    let mut current = Some(path);
    while let Some(dir) = current {
        if dir.as_os_str().is_empty() || fs::symlink_metadata(dir).is_ok() {
            break;
        }
        missing.push(dir.to_path_buf());
        current = dir.parent();
    }

    fs::create_dir_all(path).map_err(|e| ModError::io(path, e))?;
    report.dirs_created += missing.len();
    report.created.extend(missing.into_iter().rev());
    Ok(())
}

fn copy_dir(
    root: &Path,
    dir: &Path,
    dest: &Path,
    visiting: &mut Vec<PathBuf>,
    report: &mut CopyReport,
) -> ModResult<()> {
    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(dir)
            .map_err(|e| ModError::Path(format!("{}: {}", entry.path().display(), e)))?;
        let target = dest.join(rel);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            if !target.exists() {
                create_dirs(&target, report)?;
            }
        } else if file_type.is_symlink() {
            let resolved = match fs::canonicalize(entry.path()) {
                Ok(resolved) => resolved,
                Err(e) => {
                    tracing::warn!(path = %entry.path().display(), error = %e, "Skipping dangling link");
                    report.skipped.push(entry.path().to_path_buf());
                    continue;
                }
            };

            if !resolved.starts_with(root) {
                tracing::debug!(
                    path = %entry.path().display(),
                    target = %resolved.display(),
                    "Skipping link that leaves the tree"
                );
                report.skipped.push(entry.path().to_path_buf());
                continue;
            }

            if resolved.is_dir() {
                // A link back to a directory already being walked would never end
                if visiting.contains(&resolved) || entry.path().starts_with(&resolved) {
                    report.skipped.push(entry.path().to_path_buf());
                    continue;
                }
                visiting.push(resolved.clone());
                let result = copy_dir(root, &resolved, &target, visiting, report);
                visiting.pop();
                result?;
            } else {
                copy_file(&resolved, &target, report)?;
            }
        } else {
            copy_file(entry.path(), &target, report)?;
        }
    }

    Ok(())
}

fn copy_file(src: &Path, dest: &Path, report: &mut CopyReport) -> ModResult<()> {
    if fs::symlink_metadata(dest).is_ok() {
        tracing::debug!(dest = %dest.display(), "Destination exists, not overwriting");
        report.skipped.push(dest.to_path_buf());
        return Ok(());
    }

    if let Some(parent) = dest.parent() {
        if !parent.exists() {
            create_dirs(parent, report)?;
        }
    }

    if let Err(e) = fs::copy(src, dest) {
        // `dest` did not exist before, so a half-written file is ours to drop
        if fs::symlink_metadata(dest).is_ok() {
            if let Err(cleanup) = fs::remove_file(dest) {
                tracing::warn!(dest = %dest.display(), error = %cleanup, "Could not remove partial file");
            }
        }
        return Err(ModError::io(src, e));
    }
    report.files_copied += 1;
    report.created.push(dest.to_path_buf());
    Ok(())
}

/// Delete a file or directory tree, children first.
///
/// Deleting a path that does not exist succeeds. Links are removed, never
/// followed.
pub fn delete_tree(path: &Path) -> ModResult<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(ModError::Io(e)),
    };

    let removed = if metadata.is_dir() {
        for entry in fs::read_dir(path)? {
            delete_tree(&entry?.path())?;
        }
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    };

    match removed {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Deleting file/folder failed");
            Err(ModError::Io(e))
        }
    }
}

/// Add the immediate entries of `directory` to `paths`.
///
/// Non-recursive. Returns how many entries were new to the set, so repeated
/// calls can aggregate several directories into one accumulator.
pub fn list_dir(directory: &Path, paths: &mut BTreeSet<PathBuf>) -> ModResult<usize> {
    let entries = fs::read_dir(directory).map_err(|e| {
        tracing::error!(directory = %directory.display(), error = %e, "Listing files failed");
        ModError::io(directory, e)
    })?;

    let mut added = 0;
    for entry in entries {
        if paths.insert(entry?.path()) {
            added += 1;
        }
    }

    Ok(added)
}

/// Read a text file into a string, line breaks preserved
pub fn read_to_string(path: &Path) -> ModResult<String> {
    fs::read_to_string(path).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "Reading a file to a string failed");
        ModError::io(path, e)
    })
}
