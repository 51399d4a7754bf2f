use std::path::Path;
use std::time::Duration;

use colored::*;

use crate::terminal::colors;
use sieve_core::intake::IntakeReport;
use sieve_core::metrics::TimerStats;

pub type Detail = (String, ColoredString);

pub fn path_value(path: &Path) -> ColoredString {
    path.display().to_string().color(colors::PATH)
}

pub fn count_value(count: usize) -> ColoredString {
    count.to_string().color(colors::ADDRESS)
}

pub fn duration_value(duration: Duration) -> String {
    let micros: u128 = duration.as_micros();
    match micros {
        0..1_000 => format!("{micros}µs"),
        1_000..1_000_000 => format!("{:.2}ms", duration.as_secs_f64() * 1_000.0),
        _ => format!("{:.2}s", duration.as_secs_f64()),
    }
}

pub fn report_details(report: &IntakeReport) -> Vec<Detail> {
    let dropped: usize = report.unique.saturating_sub(report.kept);
    vec![
        ("Loaded".to_string(), count_value(report.loaded)),
        ("Unique".to_string(), count_value(report.unique)),
        ("Kept".to_string(), count_value(report.kept)),
        (
            "Dropped".to_string(),
            dropped.to_string().color(colors::ACCENT),
        ),
        ("Cleared".to_string(), count_value(report.deleted_files)),
        ("Model".to_string(), path_value(&report.model_path)),
        ("Results".to_string(), path_value(&report.results_path)),
        (
            "Phase".to_string(),
            report.phase.name().color(colors::PRIMARY),
        ),
    ]
}

pub fn timer_details(stats: &TimerStats) -> Vec<Detail> {
    vec![
        ("Count".to_string(), stats.count.to_string().normal()),
        ("Total".to_string(), duration_value(stats.total).normal()),
        ("Mean".to_string(), duration_value(stats.mean()).normal()),
        ("Min".to_string(), duration_value(stats.min).normal()),
        ("Max".to_string(), duration_value(stats.max).normal()),
    ]
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
