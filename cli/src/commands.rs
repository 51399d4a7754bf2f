pub mod intake;
pub mod phase;
pub mod update;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sieve_common::config::IntakeSettings;
use sieve_common::phase::PipelinePhase;

#[derive(Parser)]
#[command(name = "sieve")]
#[command(about = "Seed-list intake and phase control for IPv6 scan campaigns.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Campaign workspace directory
    #[arg(short, long, global = true, default_value = "output")]
    pub workspace: PathBuf,

    /// Reduce output (-q hides headers, -qq only shows warnings and errors)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub quiet: u8,

    /// Increase log verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest a seed list and reset the workspace for a new campaign
    #[command(alias = "i")]
    Intake(IntakeArgs),
    /// Show or change the persisted pipeline phase
    #[command(alias = "p")]
    Phase {
        /// Force the state file to this phase
        #[arg(long, conflicts_with = "advance")]
        set: Option<PipelinePhase>,
        /// Move to the successor of the current phase
        #[arg(long)]
        advance: bool,
    },
    /// Append the newest clean ping results to the output file
    #[command(alias = "u")]
    UpdateOutput {
        /// Encoding of the output file (bin or text)
        #[arg(long = "output-type", default_value = "text")]
        output_type: String,
    },
}

#[derive(Args)]
pub struct IntakeArgs {
    /// Seed address list
    pub input: PathBuf,

    /// Encoding of the seed list (bin or text)
    #[arg(short = 't', long = "input-type", default_value = "text")]
    pub input_type: String,

    /// Minimum number of surviving addresses before the operator is asked
    #[arg(long, default_value_t = IntakeSettings::default().min_addresses)]
    pub min_addresses: usize,

    /// Number of low-order bits the entropy score looks at
    #[arg(
        long = "entropy-bits",
        default_value_t = IntakeSettings::default().entropy_bit_length,
        value_parser = clap::value_parser!(u8).range(1..=128)
    )]
    pub entropy_bits: u8,

    /// Addresses scoring at or above this are dropped
    #[arg(long, default_value_t = IntakeSettings::default().entropy_threshold)]
    pub entropy_threshold: f64,

    /// Log progress every N addresses
    #[arg(long, default_value_t = IntakeSettings::default().emit_freq)]
    pub emit_freq: usize,

    /// Answer yes to every confirmation
    #[arg(short, long)]
    pub yes: bool,
}

impl IntakeArgs {
    pub fn settings(&self) -> IntakeSettings {
        IntakeSettings {
            min_addresses: self.min_addresses,
            entropy_bit_length: self.entropy_bits,
            entropy_threshold: self.entropy_threshold,
            emit_freq: self.emit_freq,
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
