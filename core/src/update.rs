//! Appends the newest clean ping results to the campaign's running output file.

use std::path::{Path, PathBuf};

use sieve_common::address::AddressList;
use sieve_common::config::{AddressEncoding, Workspace};
use sieve_common::error::IntakeResult;
use sieve_common::info;

use crate::metrics;
use crate::writer::ResultWriter;
use crate::{codec, workspace};

/// Clean ping results are an internal hand-off between phases and are always text.
pub const CLEAN_PINGS_ENCODING: AddressEncoding = AddressEncoding::Text;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressFileUpdate {
    pub source: Option<PathBuf>,
    pub output: PathBuf,
    pub appended: usize,
}

/// Reads the most recent file in the clean-pings directory and appends its
/// addresses to the output file in `encoding`.
///
/// With no clean results yet, nothing is written.
pub fn update_address_file(
    workspace: &Workspace,
    encoding: AddressEncoding,
    writer: &ResultWriter,
) -> IntakeResult<AddressFileUpdate> {
    let output: PathBuf = workspace.output_file();
    let clean_dir: PathBuf = workspace.clean_pings_dir();

    let Some(source) = newest_clean_results(&clean_dir)? else {
        info!("No clean ping results found in '{}'.", clean_dir.display());
        return Ok(AddressFileUpdate {
            source: None,
            output,
            appended: 0,
        });
    };

    let clean: AddressList = codec::decode(&source, CLEAN_PINGS_ENCODING)?;
    info!(
        "Updating file at path '{}' with {} newly-found addresses.",
        output.display(),
        clean.len()
    );
    writer.append(&output, &clean, encoding, metrics::ADDRESS_UPDATE_WRITE)?;

    Ok(AddressFileUpdate {
        source: Some(source),
        output,
        appended: clean.len(),
    })
}

fn newest_clean_results(dir: &Path) -> IntakeResult<Option<PathBuf>> {
    if !dir.is_dir() {
        return Ok(None);
    }
    workspace::most_recent_file(dir)
}
