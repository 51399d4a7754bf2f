use std::sync::Arc;

use crate::terminal::{format, print};
use sieve_common::config::{AddressEncoding, Config};
use sieve_common::success;
use sieve_core::metrics::MetricsCollector;
use sieve_core::update::{self, AddressFileUpdate};
use sieve_core::writer::ResultWriter;

pub fn update_output(cfg: &Config) -> anyhow::Result<()> {
    let encoding: AddressEncoding = cfg.output_encoding;
    let metrics: Arc<MetricsCollector> = Arc::new(MetricsCollector::new());
    let writer = ResultWriter::new(Arc::clone(&metrics));

    let update: AddressFileUpdate = update::update_address_file(&cfg.workspace, encoding, &writer)?;

    print::header("Address File", cfg.quiet);
    if let Some(source) = &update.source {
        print::aligned_line("Source", format::path_value(source));
    }
    print::aligned_line("Output", format::path_value(&update.output));
    print::aligned_line("Appended", format::count_value(update.appended));

    for (idx, (name, stats)) in metrics.snapshot().iter().enumerate() {
        print::tree_head(idx, name);
        print::as_tree_one_level(format::timer_details(stats));
    }

    if update.appended > 0 {
        success!("Appended {} addresses as {}.", update.appended, encoding);
    }
    Ok(())
}
