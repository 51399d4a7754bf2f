//! # Result Writer
//!
//! Appends address lists to files. Each write holds an exclusive lock on the
//! target file for its whole duration and is timed into the
//! [`MetricsCollector`] the writer was built with.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fs2::FileExt;

use sieve_common::address::AddressRecord;
use sieve_common::config::AddressEncoding;
use sieve_common::error::{IntakeError, IntakeResult};
use sieve_common::{error, info, success};

use crate::codec;
use crate::metrics::{self, MetricsCollector};
use crate::workspace;

/// Destination for the addresses that survive an intake run.
pub trait AddressSink {
    /// Persists `addrs` and returns where they were written.
    fn persist(&self, addrs: &[AddressRecord]) -> IntakeResult<PathBuf>;
}

#[derive(Clone, Debug)]
pub struct ResultWriter {
    metrics: Arc<MetricsCollector>,
}

impl ResultWriter {
    pub fn new(metrics: Arc<MetricsCollector>) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Appends `addrs` to `path` (creating it if needed) and records the
    /// elapsed time under `metric`.
    pub fn append(
        &self,
        path: &Path,
        addrs: &[AddressRecord],
        encoding: AddressEncoding,
        metric: &'static str,
    ) -> IntakeResult<()> {
        info!(
            "Writing {} addresses ({encoding}) to file at path '{}'.",
            addrs.len(),
            path.display()
        );

        let result: IntakeResult<()> = self.metrics.time(metric, || -> IntakeResult<()> {
            let file: File = OpenOptions::new()
                .append(true)
                .create(true)
                .open(path)
                .map_err(|e| IntakeError::io("open", path, e))?;
            file.lock_exclusive()
                .map_err(|e| IntakeError::io("lock", path, e))?;

            let mut writer = BufWriter::new(&file);
            codec::encode_into(&mut writer, addrs, encoding)
                .and_then(|()| writer.flush())
                .map_err(|e| IntakeError::io("write", path, e))?;
            drop(writer);

            file.sync_data().map_err(|e| IntakeError::io("sync", path, e))
        });

        match &result {
            Ok(()) => success!("Finished writing {} addresses to '{}'.", addrs.len(), path.display()),
            Err(e) => error!("Error thrown when writing addresses: {e}"),
        }
        result
    }
}

/// Writes each batch to a new timestamped file inside a directory.
#[derive(Clone, Debug)]
pub struct TimedFileSink {
    dir: PathBuf,
    encoding: AddressEncoding,
    writer: ResultWriter,
}

impl TimedFileSink {
    pub fn new(dir: impl Into<PathBuf>, encoding: AddressEncoding, writer: ResultWriter) -> Self {
        Self {
            dir: dir.into(),
            encoding,
            writer,
        }
    }
}

impl AddressSink for TimedFileSink {
    fn persist(&self, addrs: &[AddressRecord]) -> IntakeResult<PathBuf> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| IntakeError::io("create directory", &self.dir, e))?;
        let path: PathBuf = workspace::create_timed_file(&self.dir)?;
        self.writer
            .append(&path, addrs, self.encoding, metrics::INTAKE_WRITE)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addrs(values: &[u128]) -> Vec<AddressRecord> {
        values.iter().copied().map(AddressRecord::from).collect()
    }

    #[test]
    fn append_accumulates_and_times_each_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        let writer = ResultWriter::new(Arc::new(MetricsCollector::new()));

        writer
            .append(&path, &addrs(&[1, 2]), AddressEncoding::Binary, metrics::ADDRESS_UPDATE_WRITE)
            .unwrap();
        writer
            .append(&path, &addrs(&[3]), AddressEncoding::Binary, metrics::ADDRESS_UPDATE_WRITE)
            .unwrap();

        let written = codec::decode(&path, AddressEncoding::Binary).unwrap();
        assert_eq!(written, addrs(&[1, 2, 3]));
        assert_eq!(writer.metrics().timer(metrics::ADDRESS_UPDATE_WRITE).unwrap().count, 2);
    }

    #[test]
    fn text_append_writes_one_line_per_address() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let writer = ResultWriter::new(Arc::new(MetricsCollector::new()));

        writer
            .append(&path, &addrs(&[1, 0xff]), AddressEncoding::Text, metrics::INTAKE_WRITE)
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "::1\n::ff\n");
    }

    #[test]
    fn failed_open_is_still_timed() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ResultWriter::new(Arc::new(MetricsCollector::new()));

        let result = writer.append(
            &dir.path().join("missing/out.txt"),
            &addrs(&[1]),
            AddressEncoding::Text,
            metrics::INTAKE_WRITE,
        );

        assert!(matches!(result, Err(IntakeError::Io { action: "open", .. })));
        assert_eq!(writer.metrics().timer(metrics::INTAKE_WRITE).unwrap().count, 1);
    }

    #[test]
    fn timed_sink_creates_a_fresh_file_per_batch() {
        let dir = tempfile::tempdir().unwrap();
        let results_dir = dir.path().join("ping_results");
        let sink = TimedFileSink::new(
            &results_dir,
            AddressEncoding::Text,
            ResultWriter::new(Arc::new(MetricsCollector::new())),
        );

        let first = sink.persist(&addrs(&[1])).unwrap();
        let second = sink.persist(&addrs(&[2])).unwrap();

        assert_ne!(first, second);
        assert_eq!(codec::decode(&first, AddressEncoding::Text).unwrap(), addrs(&[1]));
        assert_eq!(codec::decode(&second, AddressEncoding::Text).unwrap(), addrs(&[2]));
    }
}
