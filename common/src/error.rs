use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::phase::PipelinePhase;

pub type IntakeResult<T> = Result<T, IntakeError>;

/// Failures surfaced by the intake components.
///
/// [`IntakeError::ConfirmationDeclined`] and
/// [`IntakeError::InsufficientAddresses`] are operator decisions, not faults;
/// use [`IntakeError::is_operator_abort`] to tell them apart.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// Input that cannot be decoded (address files, the state file).
    #[error("malformed content in '{}': {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    #[error("failed to {action} '{}': {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{message}")]
    ConfirmationDeclined { message: String },

    #[error("only {found} addresses remain (at least {minimum} recommended). {message}")]
    InsufficientAddresses {
        found: usize,
        minimum: usize,
        message: String,
    },

    #[error("phase '{from}' cannot advance to '{to}'")]
    IllegalTransition {
        from: PipelinePhase,
        to: PipelinePhase,
    },

    #[error("invalid setting '{name}': {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}

impl IntakeError {
    pub fn io(action: &'static str, path: impl AsRef<Path>, source: io::Error) -> Self {
        IntakeError::Io {
            action,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn format(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        IntakeError::Format {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn declined(message: impl Into<String>) -> Self {
        IntakeError::ConfirmationDeclined {
            message: message.into(),
        }
    }

    /// True when the run stopped because the operator said no.
    pub fn is_operator_abort(&self) -> bool {
        matches!(
            self,
            IntakeError::ConfirmationDeclined { .. } | IntakeError::InsufficientAddresses { .. }
        )
    }
}
