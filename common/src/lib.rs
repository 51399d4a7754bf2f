//! # Sieve Common
//!
//! Types shared by every crate in the workspace:
//!
//! * **[`address`]**: the 128-bit address record and its textual forms.
//! * **[`phase`]**: the phases of the scan cycle and their transition table.
//! * **[`config`]**: run configuration and the workspace directory layout.
//! * **[`error`]**: the error taxonomy returned by the intake components.
//! * **[`log`]**: logging macros layered over `tracing`.

pub mod address;
pub mod config;
pub mod error;
pub mod log;
pub mod phase;

#[doc(hidden)]
pub use tracing as __tracing;
