//! # Workspace Maintenance
//!
//! Filesystem housekeeping for a campaign workspace: the destructive reset
//! that precedes a fresh intake, directory layout creation, and the helpers
//! used to name and find timestamped result files.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::Utc;

use sieve_common::config::Workspace;
use sieve_common::error::{IntakeError, IntakeResult};
use sieve_common::{debug, info};

/// Purges the files of a workspace before a fresh start.
pub trait WorkspaceCleaner {
    /// Deletes every regular file beneath `base_dir`, returning how many were removed.
    ///
    /// Directories are left in place. A failure part way through leaves the
    /// workspace in an unknown state; nothing already deleted is restored.
    fn reset(&self, base_dir: &Path) -> IntakeResult<usize>;
}

/// Cleaner backed by the real filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileSystemCleaner;

impl WorkspaceCleaner for FileSystemCleaner {
    fn reset(&self, base_dir: &Path) -> IntakeResult<usize> {
        delete_files_with(base_dir, |path| fs::remove_file(path))
    }
}

/// Walks `base_dir` depth-first in name order and hands every regular file to
/// `remove`. Stops at the first failure.
///
/// Symlinks are neither followed nor removed. A missing `base_dir` counts as
/// an empty workspace.
pub fn delete_files_with<F>(base_dir: &Path, mut remove: F) -> IntakeResult<usize>
where
    F: FnMut(&Path) -> io::Result<()>,
{
    if !base_dir.exists() {
        debug!("Nothing to delete, '{}' does not exist.", base_dir.display());
        return Ok(0);
    }

    let mut deleted: usize = 0;
    let mut pending: Vec<PathBuf> = vec![base_dir.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries: Vec<PathBuf> = fs::read_dir(&dir)
            .map_err(|e| IntakeError::io("list directory", &dir, e))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<_>>()
            .map_err(|e| IntakeError::io("list directory", &dir, e))?;
        entries.sort();

        let mut subdirs: Vec<PathBuf> = Vec::new();
        for path in entries {
            let file_type = fs::symlink_metadata(&path)
                .map_err(|e| IntakeError::io("inspect", &path, e))?
                .file_type();

            if file_type.is_dir() {
                subdirs.push(path);
            } else if file_type.is_file() {
                remove(&path).map_err(|e| IntakeError::io("delete", &path, e))?;
                debug!("Deleted '{}'.", path.display());
                deleted += 1;
            }
        }

        // Reverse so the stack pops subdirectories in name order.
        pending.extend(subdirs.into_iter().rev());
    }

    Ok(deleted)
}

/// Creates any missing workspace directory.
pub fn ensure_layout(workspace: &Workspace) -> IntakeResult<()> {
    for dir in workspace.directories() {
        if dir.is_dir() {
            continue;
        }
        info!("No directory found at '{}'. Creating now.", dir.display());
        fs::create_dir_all(&dir).map_err(|e| IntakeError::io("create directory", &dir, e))?;
    }
    Ok(())
}

/// A fresh file path inside `dir` named after the current time.
///
/// Names sort in creation order. If the name is already taken (two calls in
/// the same microsecond) a counter suffix is appended.
pub fn timed_file_path(dir: &Path) -> PathBuf {
    let stamp: i64 = Utc::now().timestamp_micros();
    let mut candidate: PathBuf = dir.join(stamp.to_string());
    let mut suffix: u32 = 1;
    while candidate.exists() {
        candidate = dir.join(format!("{stamp}-{suffix}"));
        suffix += 1;
    }
    candidate
}

/// Creates a new empty file named after the current time and returns its path.
///
/// The file is created with `create_new`, so concurrent callers in the same
/// microsecond each end up with their own file.
pub fn create_timed_file(dir: &Path) -> IntakeResult<PathBuf> {
    loop {
        let candidate: PathBuf = timed_file_path(dir);
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(_) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!("'{}' was taken, picking another name.", candidate.display());
            }
            Err(e) => return Err(IntakeError::io("create", &candidate, e)),
        }
    }
}

/// The regular file in `dir` with the newest modification time.
pub fn most_recent_file(dir: &Path) -> IntakeResult<Option<PathBuf>> {
    let newest = regular_files(dir)?
        .into_iter()
        .max_by(|(a_path, a_time), (b_path, b_time)| {
            a_time.cmp(b_time).then_with(|| a_path.cmp(b_path))
        })
        .map(|(path, _)| path);
    Ok(newest)
}

/// Every regular file in `dir` except the most recent one.
pub fn stale_files(dir: &Path) -> IntakeResult<Vec<PathBuf>> {
    let Some(newest) = most_recent_file(dir)? else {
        return Ok(Vec::new());
    };

    let mut stale: Vec<PathBuf> = regular_files(dir)?
        .into_iter()
        .map(|(path, _)| path)
        .filter(|path| *path != newest)
        .collect();
    stale.sort();

    debug!(
        "Found {} files older than '{}' in '{}'.",
        stale.len(),
        newest.display(),
        dir.display()
    );
    Ok(stale)
}

fn regular_files(dir: &Path) -> IntakeResult<Vec<(PathBuf, SystemTime)>> {
    let mut files: Vec<(PathBuf, SystemTime)> = Vec::new();

    for entry in fs::read_dir(dir).map_err(|e| IntakeError::io("list directory", dir, e))? {
        let entry = entry.map_err(|e| IntakeError::io("list directory", dir, e))?;
        let path: PathBuf = entry.path();
        let meta = fs::symlink_metadata(&path).map_err(|e| IntakeError::io("inspect", &path, e))?;
        if !meta.is_file() {
            continue;
        }
        let modified: SystemTime = meta
            .modified()
            .map_err(|e| IntakeError::io("read modification time of", &path, e))?;
        files.push((path, modified));
    }

    Ok(files)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
