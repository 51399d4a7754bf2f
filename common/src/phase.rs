//! # Pipeline Phases
//!
//! The scan campaign runs as a repeating cycle of phases. Exactly one phase is
//! active at a time and it is persisted in the workspace state file, so a
//! crashed or interrupted campaign picks up where it left off.
//!
//! Moves between phases go through [`PipelinePhase::successor`]; every other
//! move is rejected by [`PipelinePhase::can_advance_to`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PipelinePhase {
    /// Generate candidate addresses from the statistical model.
    #[default]
    GenerateAddresses,
    /// Probe the candidate addresses.
    PingAddresses,
    /// Group responsive addresses into networks and check them against the blacklist.
    NetworkGroup,
    /// Probe random addresses inside each network to detect aliased networks.
    PingNetworks,
    /// Blacklist networks that answered for too many addresses.
    PruneNetworks,
    /// Drop ping results that fall in blacklisted networks.
    RemoveBadAddresses,
    /// Feed the clean results back into the statistical model.
    UpdateModel,
    /// Append the clean results to the running output file.
    UpdateAddressFile,
    /// Archive or delete intermediate files.
    CleanUp,
    /// Flush per-cycle metrics.
    EmitMetrics,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pipeline phase '{0}'")]
pub struct UnknownPhase(pub String);

impl PipelinePhase {
    pub const ALL: [PipelinePhase; 10] = [
        PipelinePhase::GenerateAddresses,
        PipelinePhase::PingAddresses,
        PipelinePhase::NetworkGroup,
        PipelinePhase::PingNetworks,
        PipelinePhase::PruneNetworks,
        PipelinePhase::RemoveBadAddresses,
        PipelinePhase::UpdateModel,
        PipelinePhase::UpdateAddressFile,
        PipelinePhase::CleanUp,
        PipelinePhase::EmitMetrics,
    ];

    /// The only phase this one may advance to. The cycle wraps around after
    /// metrics are emitted.
    pub const fn successor(self) -> PipelinePhase {
        match self {
            PipelinePhase::GenerateAddresses => PipelinePhase::PingAddresses,
            PipelinePhase::PingAddresses => PipelinePhase::NetworkGroup,
            PipelinePhase::NetworkGroup => PipelinePhase::PingNetworks,
            PipelinePhase::PingNetworks => PipelinePhase::PruneNetworks,
            PipelinePhase::PruneNetworks => PipelinePhase::RemoveBadAddresses,
            PipelinePhase::RemoveBadAddresses => PipelinePhase::UpdateModel,
            PipelinePhase::UpdateModel => PipelinePhase::UpdateAddressFile,
            PipelinePhase::UpdateAddressFile => PipelinePhase::CleanUp,
            PipelinePhase::CleanUp => PipelinePhase::EmitMetrics,
            PipelinePhase::EmitMetrics => PipelinePhase::GenerateAddresses,
        }
    }

    pub fn can_advance_to(self, next: PipelinePhase) -> bool {
        self.successor() == next
    }

    /// Name used in the state file.
    pub const fn name(self) -> &'static str {
        match self {
            PipelinePhase::GenerateAddresses => "generate_addresses",
            PipelinePhase::PingAddresses => "ping_addresses",
            PipelinePhase::NetworkGroup => "network_group",
            PipelinePhase::PingNetworks => "ping_networks",
            PipelinePhase::PruneNetworks => "prune_networks",
            PipelinePhase::RemoveBadAddresses => "remove_bad_addresses",
            PipelinePhase::UpdateModel => "update_model",
            PipelinePhase::UpdateAddressFile => "update_address_file",
            PipelinePhase::CleanUp => "clean_up",
            PipelinePhase::EmitMetrics => "emit_metrics",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            PipelinePhase::GenerateAddresses => "awaiting address generation",
            PipelinePhase::PingAddresses => "awaiting ping of generated addresses",
            PipelinePhase::NetworkGroup => "awaiting blacklist check",
            PipelinePhase::PingNetworks => "awaiting network alias probes",
            PipelinePhase::PruneNetworks => "awaiting network pruning",
            PipelinePhase::RemoveBadAddresses => "awaiting removal of blacklisted results",
            PipelinePhase::UpdateModel => "awaiting model update",
            PipelinePhase::UpdateAddressFile => "awaiting output file update",
            PipelinePhase::CleanUp => "awaiting clean up",
            PipelinePhase::EmitMetrics => "awaiting metrics emission",
        }
    }
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PipelinePhase {
    type Err = UnknownPhase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase().replace('-', "_");
        PipelinePhase::ALL
            .into_iter()
            .find(|phase| phase.name() == needle)
            .ok_or_else(|| UnknownPhase(s.trim().to_string()))
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
