mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, Commands, intake, phase, update};
use sieve_common::config::{AddressEncoding, Config, Workspace};
use sieve_common::error::IntakeError;
use sieve_common::{debug, error};
use terminal::{logging, print};

fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose, commands.quiet);

    match run(commands) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_failure(&e),
    }
}

fn run(commands: CommandLine) -> anyhow::Result<()> {
    let mut cfg = Config {
        intake: Default::default(),
        workspace: Workspace::new(commands.workspace),
        output_encoding: AddressEncoding::default(),
        quiet: commands.quiet,
    };

    match commands.command {
        Commands::Intake(args) => {
            cfg.intake = args.settings();
            print::header("getting ready for intake", cfg.quiet);
            intake::intake(&args, &cfg)
        }
        Commands::Phase { set, advance } => phase::phase(set, advance, &cfg),
        Commands::UpdateOutput { output_type } => {
            cfg.output_encoding = AddressEncoding::resolve(&output_type);
            update::update_output(&cfg)
        }
    }
}

/// Operator refusals were already reported as warnings where they happened,
/// and get their own exit code.
fn report_failure(e: &anyhow::Error) -> ExitCode {
    match e.downcast_ref::<IntakeError>() {
        Some(cause) if cause.is_operator_abort() => {
            debug!("{e:#}");
            ExitCode::from(2)
        }
        _ => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
