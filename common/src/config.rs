//! Run configuration.
//!
//! Everything here is built once by the binary and handed down by reference;
//! nothing mutates it while a run is in progress.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{IntakeError, IntakeResult};
use crate::warn;

pub struct Config {
    pub intake: IntakeSettings,
    pub workspace: Workspace,
    /// Encoding of the running output file the address-file update appends to.
    pub output_encoding: AddressEncoding,
    /// Suppresses headers and decorations, higher means quieter.
    pub quiet: u8,
}

/// On-disk representation of an address list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AddressEncoding {
    /// Concatenated 16-byte records, no separators.
    Binary,
    /// One address per line.
    #[default]
    Text,
}

impl AddressEncoding {
    /// Maps a user-supplied encoding name to an encoding.
    ///
    /// Anything that is not an exact (case-insensitive) match for a known name
    /// is treated as text, and a warning is logged.
    pub fn resolve(name: &str) -> AddressEncoding {
        match name.parse::<AddressEncoding>() {
            Ok(encoding) => encoding,
            Err(()) => {
                warn!("Unexpected address file format '{name}'. Defaulting to text.");
                AddressEncoding::Text
            }
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            AddressEncoding::Binary => "bin",
            AddressEncoding::Text => "text",
        }
    }
}

impl FromStr for AddressEncoding {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bin" | "binary" => Ok(AddressEncoding::Binary),
            "text" | "txt" | "hex" => Ok(AddressEncoding::Text),
            _ => Err(()),
        }
    }
}

impl fmt::Display for AddressEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Thresholds that shape one intake run.
#[derive(Clone, Debug, PartialEq)]
pub struct IntakeSettings {
    /// Below this many surviving addresses the operator is asked whether to go on.
    pub min_addresses: usize,
    /// How many low-order bits the entropy score looks at.
    pub entropy_bit_length: u8,
    /// Addresses scoring at or above this value are dropped.
    pub entropy_threshold: f64,
    /// Progress is logged once every this many addresses.
    pub emit_freq: usize,
}

impl Default for IntakeSettings {
    fn default() -> Self {
        Self {
            min_addresses: 1_000,
            entropy_bit_length: 64,
            entropy_threshold: 0.6,
            emit_freq: 100_000,
        }
    }
}

impl IntakeSettings {
    pub fn validate(&self) -> IntakeResult<()> {
        if self.entropy_bit_length == 0 || self.entropy_bit_length > 128 {
            return Err(IntakeError::InvalidSetting {
                name: "entropy_bit_length",
                reason: format!("{} is outside 1..=128", self.entropy_bit_length),
            });
        }
        if self.emit_freq == 0 {
            return Err(IntakeError::InvalidSetting {
                name: "emit_freq",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.entropy_threshold.is_nan() {
            return Err(IntakeError::InvalidSetting {
                name: "entropy_threshold",
                reason: "must be a number".to_string(),
            });
        }
        Ok(())
    }
}

/// Directory layout of one scan campaign.
///
/// ```text
/// <base>/
/// ├── models/              statistical models, one file per snapshot
/// ├── ping_results/        addresses that answered (or were supplied as input)
/// ├── clean_pings/         ping results with blacklisted networks removed
/// ├── state.txt            active pipeline phase
/// └── discovered_addrs.txt running output file
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Workspace {
    base_dir: PathBuf,
}

impl Workspace {
    pub const MODEL_DIR: &'static str = "models";
    pub const PING_RESULTS_DIR: &'static str = "ping_results";
    pub const CLEAN_PINGS_DIR: &'static str = "clean_pings";
    pub const STATE_FILE: &'static str = "state.txt";
    pub const OUTPUT_FILE: &'static str = "discovered_addrs.txt";

    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn model_dir(&self) -> PathBuf {
        self.base_dir.join(Self::MODEL_DIR)
    }

    pub fn ping_results_dir(&self) -> PathBuf {
        self.base_dir.join(Self::PING_RESULTS_DIR)
    }

    pub fn clean_pings_dir(&self) -> PathBuf {
        self.base_dir.join(Self::CLEAN_PINGS_DIR)
    }

    pub fn state_file(&self) -> PathBuf {
        self.base_dir.join(Self::STATE_FILE)
    }

    pub fn output_file(&self) -> PathBuf {
        self.base_dir.join(Self::OUTPUT_FILE)
    }

    /// Every directory the campaign expects to exist, base directory first.
    pub fn directories(&self) -> Vec<PathBuf> {
        vec![
            self.base_dir.clone(),
            self.model_dir(),
            self.ping_results_dir(),
            self.clean_pings_dir(),
        ]
    }
}
