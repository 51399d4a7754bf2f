use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sieve_common::address::{AddressList, AddressRecord};
use sieve_common::config::{AddressEncoding, IntakeSettings, Workspace};
use sieve_core::codec;
use sieve_core::intake::IntakeRequest;
use sieve_core::metrics::MetricsCollector;
use sieve_core::writer::{ResultWriter, TimedFileSink};

pub fn addrs(values: &[u128]) -> AddressList {
    values.iter().copied().map(AddressRecord::from).collect()
}

/// Writes `values` as a seed list next to (not inside) the workspace.
pub fn seed_file(dir: &Path, values: &[u128], encoding: AddressEncoding) -> IntakeRequest {
    let input_path: PathBuf = dir.join(format!("seeds.{}", encoding.name()));
    fs::write(&input_path, codec::encode(&addrs(values), encoding)).unwrap();
    IntakeRequest {
        input_path,
        input_encoding: encoding,
    }
}

pub fn settings(min_addresses: usize, entropy_threshold: f64) -> IntakeSettings {
    IntakeSettings {
        min_addresses,
        entropy_threshold,
        emit_freq: 1,
        ..IntakeSettings::default()
    }
}

pub fn text_sink(ws: &Workspace, metrics: &Arc<MetricsCollector>) -> TimedFileSink {
    TimedFileSink::new(
        ws.ping_results_dir(),
        AddressEncoding::Text,
        ResultWriter::new(Arc::clone(metrics)),
    )
}

/// A workspace with a file left over from a previous campaign.
pub fn used_workspace(root: &Path) -> (Workspace, PathBuf) {
    let ws = Workspace::new(root.join("ws"));
    fs::create_dir_all(ws.ping_results_dir()).unwrap();
    let sentinel: PathBuf = ws.ping_results_dir().join("previous");
    fs::write(&sentinel, "2001:db8::1\n").unwrap();
    (ws, sentinel)
}
