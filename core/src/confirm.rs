use sieve_common::error::{IntakeError, IntakeResult};

/// Asks the operator to approve a destructive or questionable step.
///
/// Returns `Ok(())` on approval and [`IntakeError::ConfirmationDeclined`]
/// carrying `abort_message` when the operator says no. Other errors (a
/// closed terminal, say) are passed through unchanged.
pub trait Confirmer {
    fn confirm(&self, prompt: &str, abort_message: &str) -> IntakeResult<()>;
}

/// Approves everything without asking. Backs the CLI's `--yes` flag.
#[derive(Clone, Copy, Debug, Default)]
pub struct AssumeYes;

impl Confirmer for AssumeYes {
    fn confirm(&self, _prompt: &str, _abort_message: &str) -> IntakeResult<()> {
        Ok(())
    }
}

/// Declines everything. Useful for dry runs that must never touch disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysDecline;

impl Confirmer for AlwaysDecline {
    fn confirm(&self, _prompt: &str, abort_message: &str) -> IntakeResult<()> {
        Err(IntakeError::declined(abort_message))
    }
}
