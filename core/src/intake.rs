//! # Intake Pipeline
//!
//! Turns an operator-supplied address file into the starting point of a
//! fresh scan campaign:
//!
//! 1. **Confirm** that all previous workspace state may be destroyed.
//! 2. **Load** and decode the input file.
//! 3. **Deduplicate**, then **filter** out high-entropy addresses.
//! 4. **Check** the surviving count, asking again if it is below the minimum.
//! 5. **Reset** the workspace, **bootstrap** an empty model and record that
//!    the campaign is waiting for ping results.
//! 6. **Write** the surviving addresses as ping results.
//! 7. **Advance** the stored phase past the ping stage.
//!
//! Nothing on disk changes before both confirmation gates have passed. From
//! the bootstrap on, the state file always names a phase: a failed write
//! leaves it at the ping stage, and it is only advanced after the results are
//! on disk. Any error ends the run on the spot; a fresh run starts over from
//! the first gate.

use std::path::PathBuf;

use sieve_common::address::{AddressList, AddressRecord};
use sieve_common::config::{AddressEncoding, IntakeSettings, Workspace};
use sieve_common::error::{IntakeError, IntakeResult};
use sieve_common::phase::PipelinePhase;
use sieve_common::{debug, error, info, success, warn};

use crate::confirm::Confirmer;
use crate::entropy::{self, EntropyScorer, NybbleEntropy};
use crate::model::{self, BincodeModelStore, ModelStore};
use crate::state::PhaseStateStore;
use crate::workspace::{self, FileSystemCleaner, WorkspaceCleaner};
use crate::writer::AddressSink;
use crate::{codec, dedup};

/// The intake supplies the results the ping stage would otherwise produce, so
/// a successful run completes this phase.
pub const COMPLETED_PHASE: PipelinePhase = PipelinePhase::PingAddresses;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntakeStage {
    Confirming,
    Loading,
    Deduplicating,
    Filtering,
    ThresholdCheck,
    ResettingWorkspace,
    Bootstrapping,
    Writing,
    AdvancingState,
    Done,
    /// The operator declined at one of the gates.
    Aborted,
}

impl IntakeStage {
    /// The stage that follows on success, `None` for terminal stages.
    pub const fn next(self) -> Option<IntakeStage> {
        match self {
            IntakeStage::Confirming => Some(IntakeStage::Loading),
            IntakeStage::Loading => Some(IntakeStage::Deduplicating),
            IntakeStage::Deduplicating => Some(IntakeStage::Filtering),
            IntakeStage::Filtering => Some(IntakeStage::ThresholdCheck),
            IntakeStage::ThresholdCheck => Some(IntakeStage::ResettingWorkspace),
            IntakeStage::ResettingWorkspace => Some(IntakeStage::Bootstrapping),
            IntakeStage::Bootstrapping => Some(IntakeStage::Writing),
            IntakeStage::Writing => Some(IntakeStage::AdvancingState),
            IntakeStage::AdvancingState => Some(IntakeStage::Done),
            IntakeStage::Done | IntakeStage::Aborted => None,
        }
    }

    /// Gates are the only stages the operator can abort from.
    pub const fn is_gate(self) -> bool {
        matches!(self, IntakeStage::Confirming | IntakeStage::ThresholdCheck)
    }

    pub fn can_move_to(self, to: IntakeStage) -> bool {
        match to {
            IntakeStage::Aborted => self.is_gate(),
            _ => self.next() == Some(to),
        }
    }
}

/// What to ingest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntakeRequest {
    pub input_path: PathBuf,
    pub input_encoding: AddressEncoding,
}

/// Outcome of a completed run.
#[derive(Clone, Debug, PartialEq)]
pub struct IntakeReport {
    pub loaded: usize,
    pub unique: usize,
    pub kept: usize,
    pub deleted_files: usize,
    pub model_path: PathBuf,
    pub results_path: PathBuf,
    pub phase: PipelinePhase,
}

/// Orchestrates one intake run.
///
/// Collaborators with side effects outside this crate (operator prompts,
/// where results land) must be supplied; the rest default to the production
/// implementations and can be swapped with the `with_*` builders.
pub struct IntakePipeline<'a> {
    settings: &'a IntakeSettings,
    workspace: &'a Workspace,
    confirmer: Box<dyn Confirmer + 'a>,
    sink: Box<dyn AddressSink + 'a>,
    scorer: Box<dyn EntropyScorer + 'a>,
    cleaner: Box<dyn WorkspaceCleaner + 'a>,
    models: Box<dyn ModelStore + 'a>,
    state: PhaseStateStore,
    stage: IntakeStage,
    history: Vec<IntakeStage>,
}

impl<'a> IntakePipeline<'a> {
    pub fn new(
        settings: &'a IntakeSettings,
        workspace: &'a Workspace,
        confirmer: Box<dyn Confirmer + 'a>,
        sink: Box<dyn AddressSink + 'a>,
    ) -> Self {
        Self {
            settings,
            workspace,
            confirmer,
            sink,
            scorer: Box::new(NybbleEntropy),
            cleaner: Box::new(FileSystemCleaner),
            models: Box::new(BincodeModelStore),
            state: PhaseStateStore::new(workspace.state_file()),
            stage: IntakeStage::Confirming,
            history: Vec::new(),
        }
    }

    pub fn with_scorer(mut self, scorer: Box<dyn EntropyScorer + 'a>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_cleaner(mut self, cleaner: Box<dyn WorkspaceCleaner + 'a>) -> Self {
        self.cleaner = cleaner;
        self
    }

    pub fn with_model_store(mut self, models: Box<dyn ModelStore + 'a>) -> Self {
        self.models = models;
        self
    }

    /// Stage the last run reached (or failed in).
    pub fn stage(&self) -> IntakeStage {
        self.stage
    }

    /// Every stage the last run entered, in order.
    pub fn history(&self) -> &[IntakeStage] {
        &self.history
    }

    pub fn run(&mut self, request: &IntakeRequest) -> IntakeResult<IntakeReport> {
        self.stage = IntakeStage::Confirming;
        self.history = vec![IntakeStage::Confirming];
        self.settings.validate()?;

        let approval = self.confirm_clean_up(request);
        self.gate(approval)?;

        self.enter(IntakeStage::Loading);
        let loaded: AddressList = self.load(request)?;

        self.enter(IntakeStage::Deduplicating);
        let unique: AddressList = self.remove_duplicates(&loaded);

        self.enter(IntakeStage::Filtering);
        let kept: AddressList = self.remove_high_entropy(&unique);

        self.enter(IntakeStage::ThresholdCheck);
        let approval = self.check_threshold(kept.len());
        self.gate(approval)?;

        self.enter(IntakeStage::ResettingWorkspace);
        let deleted_files: usize = self.reset_workspace()?;

        self.enter(IntakeStage::Bootstrapping);
        workspace::ensure_layout(self.workspace)?;
        let model_name = format!("Model from {}", request.input_path.display());
        let model_path: PathBuf =
            model::bootstrap(&model_name, &self.workspace.model_dir(), self.models.as_ref())?;
        self.record_fresh_campaign()?;

        self.enter(IntakeStage::Writing);
        let results_path: PathBuf = self.sink.persist(&kept)?;

        self.enter(IntakeStage::AdvancingState);
        let phase: PipelinePhase = self.advance_state()?;

        self.enter(IntakeStage::Done);
        success!(
            "Intake complete: {} of {} addresses kept, pipeline is now {}.",
            kept.len(),
            loaded.len(),
            phase.description()
        );

        Ok(IntakeReport {
            loaded: loaded.len(),
            unique: unique.len(),
            kept: kept.len(),
            deleted_files,
            model_path,
            results_path,
            phase,
        })
    }

    fn enter(&mut self, next: IntakeStage) {
        debug_assert!(
            self.stage.can_move_to(next),
            "illegal intake stage move {:?} -> {next:?}",
            self.stage
        );
        debug!("Intake stage {:?} -> {next:?}.", self.stage);
        self.stage = next;
        self.history.push(next);
    }

    /// Moves to [`IntakeStage::Aborted`] when a gate was declined.
    fn gate(&mut self, approval: IntakeResult<()>) -> IntakeResult<()> {
        if let Err(e) = &approval {
            if e.is_operator_abort() {
                warn!("{e}");
                self.enter(IntakeStage::Aborted);
            }
        }
        approval
    }

    fn confirm_clean_up(&self, request: &IntakeRequest) -> IntakeResult<()> {
        let prompt = format!(
            "Provided input file at path '{}'. Starting with an input file requires cleaning up \
             all existing state from previous runs. Continue? [y/N]",
            request.input_path.display()
        );
        let abort_message = format!(
            "Exiting. Please backup all existing state (all directories under '{}') and try again.",
            self.workspace.base_dir().display()
        );
        self.confirmer.confirm(&prompt, &abort_message)
    }

    fn check_threshold(&self, count: usize) -> IntakeResult<()> {
        let minimum: usize = self.settings.min_addresses;
        if count >= minimum {
            return Ok(());
        }

        let prompt = format!(
            "The resulting list of addresses is only {count} long, and we recommend having at \
             least {minimum} to get good results. Continue? [y/N]"
        );
        let abort_message =
            "Exiting. Please add more addresses to your input list and try again.".to_string();

        match self.confirmer.confirm(&prompt, &abort_message) {
            Err(IntakeError::ConfirmationDeclined { message }) => {
                Err(IntakeError::InsufficientAddresses {
                    found: count,
                    minimum,
                    message,
                })
            }
            other => other,
        }
    }

    fn load(&self, request: &IntakeRequest) -> IntakeResult<AddressList> {
        let path = &request.input_path;
        match codec::decode(path, request.input_encoding) {
            Ok(addrs) => {
                info!(
                    "Successfully read {} addresses from {} file at '{}'.",
                    addrs.len(),
                    request.input_encoding,
                    path.display()
                );
                Ok(addrs)
            }
            Err(e) => {
                error!("Error thrown when reading addresses from file '{}': {e}", path.display());
                Err(e)
            }
        }
    }

    fn remove_duplicates(&self, addrs: &[AddressRecord]) -> AddressList {
        info!("Now removing duplicates from list of addresses of length {}.", addrs.len());
        let unique: AddressList = dedup::dedup(addrs, self.settings.emit_freq);
        info!(
            "Resulting list is {} long (removed {} duplicates).",
            unique.len(),
            addrs.len() - unique.len()
        );
        unique
    }

    fn remove_high_entropy(&self, addrs: &[AddressRecord]) -> AddressList {
        let settings = self.settings;
        info!(
            "Now removing high entropy addresses from list of length {} ({} threshold, {} bits).",
            addrs.len(),
            settings.entropy_threshold,
            settings.entropy_bit_length
        );
        let kept: AddressList = entropy::filter(
            addrs,
            settings.entropy_bit_length,
            settings.entropy_threshold,
            settings.emit_freq,
            self.scorer.as_ref(),
        );
        info!(
            "Resulting list is {} long (removed {} high entropy addresses).",
            kept.len(),
            addrs.len() - kept.len()
        );
        kept
    }

    fn reset_workspace(&self) -> IntakeResult<usize> {
        let base = self.workspace.base_dir();
        info!(
            "Now deleting all regular files (recursively) starting in directory '{}'.",
            base.display()
        );
        match self.cleaner.reset(base) {
            Ok(count) => {
                info!("Successfully deleted {count} files.");
                Ok(count)
            }
            Err(e) => {
                error!(
                    "Error thrown when deleting files under '{}', workspace is in an unknown state: {e}",
                    base.display()
                );
                Err(e)
            }
        }
    }

    /// The reset removed the old state file; the fresh campaign waits for the
    /// results this run is about to write.
    fn record_fresh_campaign(&self) -> IntakeResult<()> {
        if let Err(e) = self.state.write(COMPLETED_PHASE) {
            error!(
                "Error thrown when initialising state file at '{}': {e}",
                self.state.path().display()
            );
            return Err(e);
        }
        info!("Pipeline phase set to '{COMPLETED_PHASE}' ({}).", COMPLETED_PHASE.description());
        Ok(())
    }

    fn advance_state(&self) -> IntakeResult<PipelinePhase> {
        let next: PipelinePhase = COMPLETED_PHASE.successor();
        let advanced = self
            .state
            .read()
            .and_then(|stored| self.state.transition(stored, next));
        if let Err(e) = advanced {
            error!(
                "Error thrown when updating state file at '{}': {e}",
                self.state.path().display()
            );
            return Err(e);
        }
        Ok(next)
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
