//! # Statistical Model Bootstrap
//!
//! The statistical address model is owned by the generation phases. The
//! intake only ever creates an empty model so that the first generation run
//! has something to start from; it never looks inside one.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use sieve_common::error::{IntakeError, IntakeResult};
use sieve_common::{error, info, success};

use crate::workspace;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatisticalModel {
    name: String,
    created_at: i64,
    address_count: u64,
    body: Vec<u8>,
}

impl StatisticalModel {
    /// A model that has not seen a single address yet.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: Utc::now().timestamp(),
            address_count: 0,
            body: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address_count(&self) -> u64 {
        self.address_count
    }

    pub fn is_empty(&self) -> bool {
        self.address_count == 0
    }
}

/// Persists models to, and loads them from, a path.
pub trait ModelStore {
    fn save(&self, model: &StatisticalModel, path: &Path) -> IntakeResult<()>;
    fn load(&self, path: &Path) -> IntakeResult<StatisticalModel>;
}

/// Stores models as `bincode` blobs.
#[derive(Clone, Copy, Debug, Default)]
pub struct BincodeModelStore;

impl ModelStore for BincodeModelStore {
    fn save(&self, model: &StatisticalModel, path: &Path) -> IntakeResult<()> {
        let file = File::create(path).map_err(|e| IntakeError::io("create", path, e))?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, model).map_err(|e| match *e {
            bincode::ErrorKind::Io(io_err) => IntakeError::io("write", path, io_err),
            other => IntakeError::format(path, other.to_string()),
        })?;
        writer.flush().map_err(|e| IntakeError::io("write", path, e))?;
        Ok(())
    }

    fn load(&self, path: &Path) -> IntakeResult<StatisticalModel> {
        let file = File::open(path).map_err(|e| IntakeError::io("open", path, e))?;
        bincode::deserialize_from(BufReader::new(file))
            .map_err(|e| IntakeError::format(path, format!("not a statistical model: {e}")))
    }
}

/// Writes an empty model named `name` to a new timestamped file in `model_dir`.
pub fn bootstrap(name: &str, model_dir: &Path, store: &dyn ModelStore) -> IntakeResult<PathBuf> {
    info!("Now creating a blank statistical model.");
    let model = StatisticalModel::empty(name);

    fs::create_dir_all(model_dir)
        .map_err(|e| IntakeError::io("create directory", model_dir, e))?;
    let output_path: PathBuf = workspace::create_timed_file(model_dir)?;

    info!(
        "Writing blank statistical model with name '{}' to file '{}'.",
        model.name(),
        output_path.display()
    );
    if let Err(e) = store.save(&model, &output_path) {
        error!("Error thrown when saving model '{}': {e}", model.name());
        return Err(e);
    }

    success!("Blank model written to '{}'.", output_path.display());
    Ok(output_path)
}
