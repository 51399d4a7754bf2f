use colored::*;

use crate::terminal::{colors, print};
use sieve_common::config::Config;
use sieve_common::error::IntakeError;
use sieve_common::phase::PipelinePhase;
use sieve_common::{success, warn};
use sieve_core::state::PhaseStateStore;

pub fn phase(set: Option<PipelinePhase>, advance: bool, cfg: &Config) -> anyhow::Result<()> {
    let store = PhaseStateStore::new(cfg.workspace.state_file());

    if let Some(target) = set {
        // An override is how a damaged state file gets repaired.
        match store.read() {
            Ok(current) if current != target && !current.can_advance_to(target) => warn!(
                "Overriding pipeline phase {} with {}; this skips the regular phase order.",
                current, target
            ),
            Ok(_) => {}
            Err(e @ IntakeError::Format { .. }) => {
                warn!("Current pipeline phase is unknown ({e}); replacing it with {target}.")
            }
            Err(e) => return Err(e.into()),
        }
        store.write(target)?;
        success!("Pipeline phase set to {}.", target);
    } else if advance {
        let next: PipelinePhase = store.advance()?;
        success!("Pipeline advanced to {}.", next);
    }

    show(&store.read()?, cfg);
    Ok(())
}

fn show(current: &PipelinePhase, cfg: &Config) {
    print::header("Pipeline Phase", cfg.quiet);
    print::aligned_line("State file", cfg.workspace.state_file().display().to_string());
    print::aligned_line("Current", current.name().color(colors::PRIMARY));
    print::aligned_line("Description", current.description());
    print::aligned_line("Next", current.successor().name().color(colors::ACCENT));
}
