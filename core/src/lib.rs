//! # Sieve Core
//!
//! The intake pipeline and the components it sequences.
//!
//! * **[`intake`]**: the orchestrator and its stage machine.
//! * **[`codec`]**, **[`dedup`]**, **[`entropy`]**: pure list processing.
//! * **[`workspace`]**, **[`model`]**, **[`writer`]**, **[`state`]**: everything
//!   that touches the campaign workspace.
//! * **[`confirm`]**: the operator-approval port.
//! * **[`update`]**: the address-file update run after a scan cycle.
//!
//! Components that talk to the outside world sit behind traits
//! ([`confirm::Confirmer`], [`entropy::EntropyScorer`],
//! [`workspace::WorkspaceCleaner`], [`model::ModelStore`],
//! [`writer::AddressSink`]), so the orchestrator only depends on those
//! abstractions and tests can substitute any of them.

pub mod codec;
pub mod confirm;
pub mod dedup;
pub mod entropy;
pub mod intake;
pub mod metrics;
pub mod model;
pub mod state;
pub mod update;
pub mod workspace;
pub mod writer;
