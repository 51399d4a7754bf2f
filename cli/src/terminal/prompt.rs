use colored::*;
use console::Term;

use sieve_common::error::{IntakeError, IntakeResult};
use sieve_core::confirm::Confirmer;

/// Asks on the controlling terminal. Anything but `y`/`yes` is a refusal,
/// including no answer at all when stdin is not a terminal.
pub struct TerminalConfirmer {
    term: Term,
}

impl TerminalConfirmer {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, prompt: &str, abort_message: &str) -> IntakeResult<()> {
        let answer: String = tracing_indicatif::suspend_tracing_indicatif(|| {
            self.term.write_str(&format!("{} {} ", "[?]".yellow().bold(), prompt))?;
            self.term.read_line()
        })
        .map_err(|e| IntakeError::io("read answer from", "terminal", e))?;

        if is_approval(&answer) {
            Ok(())
        } else {
            Err(IntakeError::declined(abort_message))
        }
    }
}

fn is_approval(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
