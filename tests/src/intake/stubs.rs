//! Hand-rolled doubles for the pipeline's ports.

use std::cell::{Cell, RefCell};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sieve_common::address::{AddressList, AddressRecord};
use sieve_common::error::{IntakeError, IntakeResult};
use sieve_core::confirm::Confirmer;
use sieve_core::model::{ModelStore, StatisticalModel};
use sieve_core::workspace::{self, WorkspaceCleaner};
use sieve_core::writer::AddressSink;

/// Answers prompts in order from a script and records what was asked.
pub struct Scripted {
    answers: RefCell<Vec<bool>>,
    prompts: RefCell<Vec<String>>,
}

impl Scripted {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().rev().copied().collect()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl Confirmer for &Scripted {
    fn confirm(&self, prompt: &str, abort_message: &str) -> IntakeResult<()> {
        self.prompts.borrow_mut().push(prompt.to_string());
        match self.answers.borrow_mut().pop() {
            Some(true) => Ok(()),
            _ => Err(IntakeError::declined(abort_message)),
        }
    }
}

/// Keeps every batch in memory instead of writing it.
#[derive(Default)]
pub struct RecordingSink {
    batches: RefCell<Vec<AddressList>>,
}

impl RecordingSink {
    pub fn batches(&self) -> Vec<AddressList> {
        self.batches.borrow().clone()
    }
}

impl AddressSink for &RecordingSink {
    fn persist(&self, addrs: &[AddressRecord]) -> IntakeResult<PathBuf> {
        self.batches.borrow_mut().push(addrs.to_vec());
        Ok(PathBuf::from("memory"))
    }
}

/// Fails every write as if the disk were full.
pub struct FailingSink;

impl AddressSink for FailingSink {
    fn persist(&self, _addrs: &[AddressRecord]) -> IntakeResult<PathBuf> {
        Err(IntakeError::io(
            "write",
            "ping_results",
            io::Error::new(io::ErrorKind::StorageFull, "no space left on device"),
        ))
    }
}

/// Deletes the first file it meets, then hits a permission error.
pub struct PartialCleaner;

impl WorkspaceCleaner for PartialCleaner {
    fn reset(&self, base_dir: &Path) -> IntakeResult<usize> {
        let mut deleted: usize = 0;
        workspace::delete_files_with(base_dir, |path| {
            if deleted == 0 {
                deleted += 1;
                fs::remove_file(path)
            } else {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only file"))
            }
        })
    }
}

/// Counts saves, never touches the disk.
#[derive(Default)]
pub struct RecordingModels {
    saves: Cell<usize>,
}

impl RecordingModels {
    pub fn saves(&self) -> usize {
        self.saves.get()
    }
}

impl ModelStore for &RecordingModels {
    fn save(&self, _model: &StatisticalModel, _path: &Path) -> IntakeResult<()> {
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn load(&self, path: &Path) -> IntakeResult<StatisticalModel> {
        Err(IntakeError::format(path, "recording store holds no models"))
    }
}
