use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use tracing::info_span;

use crate::commands::IntakeArgs;
use crate::sprint;
use crate::terminal::{colors, format, print, prompt::TerminalConfirmer};
use sieve_common::config::{AddressEncoding, Config};
use sieve_common::success;
use sieve_core::confirm::{AssumeYes, Confirmer};
use sieve_core::intake::{IntakePipeline, IntakeReport, IntakeRequest};
use sieve_core::metrics::{self, MetricsCollector};
use sieve_core::writer::{ResultWriter, TimedFileSink};

pub fn intake(args: &IntakeArgs, cfg: &Config) -> anyhow::Result<()> {
    let request = IntakeRequest {
        input_path: args.input.clone(),
        input_encoding: AddressEncoding::resolve(&args.input_type),
    };

    let confirmer: Box<dyn Confirmer> = if args.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(TerminalConfirmer::new())
    };

    let metrics: Arc<MetricsCollector> = Arc::new(MetricsCollector::new());
    // Ping results are read back by the next phase, which only speaks text.
    let sink = TimedFileSink::new(
        cfg.workspace.ping_results_dir(),
        AddressEncoding::Text,
        ResultWriter::new(Arc::clone(&metrics)),
    );

    let span = info_span!("intake", indicatif.pb_show = true);
    let guard = span.enter();

    let start_time: Instant = Instant::now();
    let mut pipeline = IntakePipeline::new(&cfg.intake, &cfg.workspace, confirmer, Box::new(sink));
    let report: IntakeReport = pipeline
        .run(&request)
        .with_context(|| format!("intake stopped while {:?}", pipeline.stage()))?;

    drop(guard);

    intake_ends(&report, &metrics, start_time.elapsed(), cfg);
    Ok(())
}

fn intake_ends(report: &IntakeReport, metrics: &MetricsCollector, total_time: Duration, cfg: &Config) {
    if cfg.quiet > 0 {
        sprint!();
    }

    print::header("Intake", cfg.quiet);
    if cfg.quiet < 2 {
        print::tree_head(0, &report.results_path.display().to_string());
        print::as_tree_one_level(format::report_details(report));
    }

    if let Some(stats) = metrics.timer(metrics::INTAKE_WRITE) {
        print::aligned_line(metrics::INTAKE_WRITE, format::duration_value(stats.total));
    }

    print_summary(report, total_time, cfg);
}

fn print_summary(report: &IntakeReport, total_time: Duration, cfg: &Config) {
    let kept: ColoredString = format!("{} seed addresses", report.kept).bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: &ColoredString =
        &format!("Intake Complete: {kept} written in {total_time}").color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(output);
        }
        _ => {
            sprint!();
            success!("{}", output)
        }
    }
}
