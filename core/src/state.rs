//! # Phase State Store
//!
//! Durable home of the active [`PipelinePhase`]. The state file holds a
//! single phase name followed by a newline.
//!
//! Writes go to a sibling temporary file which is flushed to disk and then
//! renamed over the state file, so a reader sees either the old phase or the
//! new one, never a torn value.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use sieve_common::error::{IntakeError, IntakeResult};
use sieve_common::phase::PipelinePhase;
use sieve_common::{debug, info};

#[derive(Clone, Debug)]
pub struct PhaseStateStore {
    path: PathBuf,
}

impl PhaseStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the active phase. A workspace without a state file is at the
    /// start of the cycle.
    pub fn read(&self) -> IntakeResult<PipelinePhase> {
        let content: String = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No state file at '{}', assuming initial phase.", self.path.display());
                return Ok(PipelinePhase::default());
            }
            Err(e) => return Err(IntakeError::io("read", &self.path, e)),
        };

        content
            .parse::<PipelinePhase>()
            .map_err(|e| IntakeError::format(&self.path, e.to_string()))
    }

    /// Replaces the stored phase atomically.
    pub fn write(&self, phase: PipelinePhase) -> IntakeResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| IntakeError::io("create directory", parent, e))?;
        }

        let tmp_path: PathBuf = self.temp_path();
        let mut file: File = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)
            .map_err(|e| IntakeError::io("create", &tmp_path, e))?;
        file.lock_exclusive()
            .map_err(|e| IntakeError::io("lock", &tmp_path, e))?;

        writeln!(file, "{}", phase.name()).map_err(|e| IntakeError::io("write", &tmp_path, e))?;
        file.sync_all()
            .map_err(|e| IntakeError::io("sync", &tmp_path, e))?;
        drop(file);

        fs::rename(&tmp_path, &self.path).map_err(|e| IntakeError::io("replace", &self.path, e))?;
        self.sync_parent()?;
        debug!("State file '{}' now holds '{phase}'.", self.path.display());
        Ok(())
    }

    /// Moves from `from` to `to` if the transition table allows it.
    pub fn transition(&self, from: PipelinePhase, to: PipelinePhase) -> IntakeResult<()> {
        if !from.can_advance_to(to) {
            return Err(IntakeError::IllegalTransition { from, to });
        }
        self.write(to)?;
        info!("Pipeline phase advanced from '{from}' to '{to}' ({}).", to.description());
        Ok(())
    }

    /// Advances the stored phase to its successor and returns the new phase.
    pub fn advance(&self) -> IntakeResult<PipelinePhase> {
        let current: PipelinePhase = self.read()?;
        let next: PipelinePhase = current.successor();
        self.transition(current, next)?;
        Ok(next)
    }

    /// Flushes the directory entry created by the rename.
    #[cfg(unix)]
    fn sync_parent(&self) -> IntakeResult<()> {
        let parent: &Path = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        File::open(parent)
            .and_then(|dir| dir.sync_all())
            .map_err(|e| IntakeError::io("sync directory", parent, e))
    }

    #[cfg(not(unix))]
    fn sync_parent(&self) -> IntakeResult<()> {
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "state".to_string());
        self.path.with_file_name(format!(".{file_name}.tmp"))
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
