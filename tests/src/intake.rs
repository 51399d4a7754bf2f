mod stubs;

use std::fs;
use std::sync::Arc;

use sieve_common::config::{AddressEncoding, Workspace};
use sieve_common::error::IntakeError;
use sieve_common::phase::PipelinePhase;
use sieve_core::codec;
use sieve_core::confirm::{AlwaysDecline, AssumeYes};
use sieve_core::intake::{IntakePipeline, IntakeRequest, IntakeStage};
use sieve_core::metrics::{self, MetricsCollector};
use sieve_core::state::PhaseStateStore;

use crate::util::{addrs, seed_file, settings, text_sink, used_workspace};
use stubs::{FailingSink, PartialCleaner, RecordingModels, RecordingSink, Scripted};

const A: u128 = 0x2001_0db8_0000_0000_0000_0000_0000_0001;
const B: u128 = 0x2001_0db8_0000_0000_0000_0000_0000_0002;
const C: u128 = 0x2001_0db8_0000_0001_0000_0000_0000_0001;

#[test]
fn binary_seed_list_is_deduplicated_and_staged_for_grouping() {
    let dir = tempfile::tempdir().unwrap();
    let (ws, sentinel) = used_workspace(dir.path());
    let request = seed_file(dir.path(), &[A, B, A, C], AddressEncoding::Binary);
    let cfg = settings(1, 1.0);
    let metrics = Arc::new(MetricsCollector::new());

    let mut pipeline = IntakePipeline::new(
        &cfg,
        &ws,
        Box::new(AssumeYes),
        Box::new(text_sink(&ws, &metrics)),
    );
    let report = pipeline.run(&request).unwrap();

    assert_eq!((report.loaded, report.unique, report.kept), (4, 3, 3));
    assert_eq!(report.deleted_files, 1);
    assert!(!sentinel.exists());
    assert_eq!(
        codec::decode(&report.results_path, AddressEncoding::Text).unwrap(),
        addrs(&[A, B, C])
    );
    assert!(report.results_path.starts_with(ws.ping_results_dir()));
    assert!(report.model_path.starts_with(ws.model_dir()));
    for path in ws.directories() {
        assert!(path.is_dir(), "{} missing", path.display());
    }

    assert_eq!(report.phase, PipelinePhase::NetworkGroup);
    let state = PhaseStateStore::new(ws.state_file());
    assert_eq!(state.read().unwrap(), PipelinePhase::NetworkGroup);
    assert_eq!(pipeline.stage(), IntakeStage::Done);
    assert_eq!(metrics.timer(metrics::INTAKE_WRITE).unwrap().count, 1);
}

#[test]
fn text_seed_list_with_blank_lines_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let ws = Workspace::new(dir.path().join("ws"));
    let input_path = dir.path().join("seeds.txt");
    fs::write(&input_path, "2001:db8::1\n\n2001:db8::2\n").unwrap();
    let request = IntakeRequest {
        input_path,
        input_encoding: AddressEncoding::Text,
    };
    let cfg = settings(1, f64::INFINITY);
    let sink = RecordingSink::default();

    let mut pipeline = IntakePipeline::new(&cfg, &ws, Box::new(AssumeYes), Box::new(&sink));
    let report = pipeline.run(&request).unwrap();

    assert_eq!(report.kept, 2);
    assert_eq!(sink.batches(), vec![addrs(&[A, B])]);
}

#[test]
fn declined_clean_up_leaves_workspace_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let (ws, sentinel) = used_workspace(dir.path());
    let request = seed_file(dir.path(), &[A, B], AddressEncoding::Binary);
    let cfg = settings(1, f64::INFINITY);
    let sink = RecordingSink::default();

    let mut pipeline = IntakePipeline::new(&cfg, &ws, Box::new(AlwaysDecline), Box::new(&sink));
    let err = pipeline.run(&request).unwrap_err();

    assert!(matches!(err, IntakeError::ConfirmationDeclined { .. }));
    assert!(err.is_operator_abort());
    assert_eq!(pipeline.stage(), IntakeStage::Aborted);
    assert!(sentinel.exists());
    assert!(!ws.model_dir().exists());
    assert!(sink.batches().is_empty());
}

#[test]
fn too_few_addresses_declined_keeps_previous_state() {
    let dir = tempfile::tempdir().unwrap();
    let (ws, sentinel) = used_workspace(dir.path());
    let state = PhaseStateStore::new(ws.state_file());
    state.write(PipelinePhase::UpdateModel).unwrap();
    let request = seed_file(dir.path(), &[A, B, A], AddressEncoding::Binary);
    let cfg = settings(10, f64::INFINITY);

    let confirmer = Scripted::answering(&[true, false]);
    let sink = RecordingSink::default();
    let mut pipeline = IntakePipeline::new(&cfg, &ws, Box::new(&confirmer), Box::new(&sink));
    let err = pipeline.run(&request).unwrap_err();

    match err {
        IntakeError::InsufficientAddresses { found, minimum, .. } => {
            assert_eq!((found, minimum), (2, 10));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(confirmer.prompts().len(), 2);
    assert!(confirmer.prompts()[1].contains("only 2 long"));
    assert_eq!(fs::read_to_string(&sentinel).unwrap(), "2001:db8::1\n");
    assert_eq!(state.read().unwrap(), PipelinePhase::UpdateModel);
}

#[test]
fn too_few_addresses_accepted_carries_on() {
    let dir = tempfile::tempdir().unwrap();
    let ws = Workspace::new(dir.path().join("ws"));
    let request = seed_file(dir.path(), &[A], AddressEncoding::Binary);
    let cfg = settings(10, f64::INFINITY);
    let sink = RecordingSink::default();

    let confirmer = Scripted::answering(&[true, true]);
    let mut pipeline = IntakePipeline::new(&cfg, &ws, Box::new(&confirmer), Box::new(&sink));
    let report = pipeline.run(&request).unwrap();

    assert_eq!(report.kept, 1);
    assert_eq!(sink.batches().len(), 1);
}

#[test]
fn failed_reset_stops_before_bootstrap() {
    let dir = tempfile::tempdir().unwrap();
    let (ws, _) = used_workspace(dir.path());
    fs::write(ws.base_dir().join("state.txt"), "clean_up\n").unwrap();
    let request = seed_file(dir.path(), &[A, B], AddressEncoding::Binary);
    let cfg = settings(1, f64::INFINITY);
    let sink = RecordingSink::default();
    let models = RecordingModels::default();

    let mut pipeline = IntakePipeline::new(&cfg, &ws, Box::new(AssumeYes), Box::new(&sink))
        .with_cleaner(Box::new(PartialCleaner))
        .with_model_store(Box::new(&models));
    let err = pipeline.run(&request).unwrap_err();

    assert!(matches!(err, IntakeError::Io { .. }));
    assert!(!err.is_operator_abort());
    assert_eq!(pipeline.stage(), IntakeStage::ResettingWorkspace);
    assert_eq!(models.saves(), 0);
    assert!(sink.batches().is_empty());
}

#[test]
fn failed_write_leaves_state_at_the_ping_stage() {
    let dir = tempfile::tempdir().unwrap();
    let (ws, _) = used_workspace(dir.path());
    let state = PhaseStateStore::new(ws.state_file());
    state.write(PipelinePhase::UpdateModel).unwrap();
    let request = seed_file(dir.path(), &[A, B], AddressEncoding::Binary);
    let cfg = settings(1, f64::INFINITY);

    let mut pipeline = IntakePipeline::new(&cfg, &ws, Box::new(AssumeYes), Box::new(FailingSink));
    let err = pipeline.run(&request).unwrap_err();

    assert!(matches!(err, IntakeError::Io { .. }));
    assert_eq!(pipeline.stage(), IntakeStage::Writing);
    assert_eq!(fs::read_to_string(ws.state_file()).unwrap(), "ping_addresses\n");
    assert_eq!(state.read().unwrap(), PipelinePhase::PingAddresses);
}

#[test]
fn retried_intake_after_failed_write_advances_once() {
    let dir = tempfile::tempdir().unwrap();
    let ws = Workspace::new(dir.path().join("ws"));
    let request = seed_file(dir.path(), &[A, B], AddressEncoding::Binary);
    let cfg = settings(1, f64::INFINITY);

    let mut failing =
        IntakePipeline::new(&cfg, &ws, Box::new(AssumeYes), Box::new(FailingSink));
    assert!(failing.run(&request).is_err());

    let sink = RecordingSink::default();
    let mut retry = IntakePipeline::new(&cfg, &ws, Box::new(AssumeYes), Box::new(&sink));
    let report = retry.run(&request).unwrap();

    assert_eq!(report.phase, PipelinePhase::NetworkGroup);
    assert_eq!(
        PhaseStateStore::new(ws.state_file()).read().unwrap(),
        PipelinePhase::NetworkGroup
    );
}

#[test]
fn truncated_binary_input_is_a_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let (ws, sentinel) = used_workspace(dir.path());
    let input_path = dir.path().join("seeds.bin");
    fs::write(&input_path, [0u8; 20]).unwrap();
    let request = IntakeRequest {
        input_path,
        input_encoding: AddressEncoding::Binary,
    };
    let cfg = settings(1, f64::INFINITY);

    let sink = RecordingSink::default();
    let mut pipeline = IntakePipeline::new(&cfg, &ws, Box::new(AssumeYes), Box::new(&sink));
    let err = pipeline.run(&request).unwrap_err();

    assert!(matches!(err, IntakeError::Format { .. }));
    assert_eq!(pipeline.stage(), IntakeStage::Loading);
    assert!(sentinel.exists());
}

#[test]
fn missing_input_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let ws = Workspace::new(dir.path().join("ws"));
    let request = IntakeRequest {
        input_path: dir.path().join("absent.bin"),
        input_encoding: AddressEncoding::Binary,
    };
    let cfg = settings(1, f64::INFINITY);

    let sink = RecordingSink::default();
    let mut pipeline = IntakePipeline::new(&cfg, &ws, Box::new(AssumeYes), Box::new(&sink));

    assert!(matches!(pipeline.run(&request), Err(IntakeError::Io { .. })));
}

#[test]
fn entropy_threshold_drops_random_looking_addresses() {
    let dir = tempfile::tempdir().unwrap();
    let ws = Workspace::new(dir.path().join("ws"));
    let low: u128 = 0x2001_0db8_0000_0000_0000_0000_0000_0001;
    let high: u128 = 0x2001_0db8_0000_0000_0123_4567_89ab_cdef;
    let request = seed_file(dir.path(), &[low, high], AddressEncoding::Binary);
    let cfg = settings(1, 0.6);
    let sink = RecordingSink::default();

    let mut pipeline = IntakePipeline::new(&cfg, &ws, Box::new(AssumeYes), Box::new(&sink));
    let report = pipeline.run(&request).unwrap();

    assert_eq!((report.unique, report.kept), (2, 1));
    assert_eq!(sink.batches(), vec![addrs(&[low])]);
}

#[test]
fn random_seed_lists_round_trip_through_the_workspace() {
    use rand::Rng;

    let dir = tempfile::tempdir().unwrap();
    let ws = Workspace::new(dir.path().join("ws"));
    let mut rng = rand::rng();
    let mut values: Vec<u128> = (0..64).map(|_| rng.random::<u128>()).collect();
    let repeats: Vec<u128> = values[..16].to_vec();
    values.extend(repeats);
    let request = seed_file(dir.path(), &values, AddressEncoding::Text);
    let cfg = settings(1, f64::INFINITY);
    let metrics = Arc::new(MetricsCollector::new());

    let mut pipeline = IntakePipeline::new(
        &cfg,
        &ws,
        Box::new(AssumeYes),
        Box::new(text_sink(&ws, &metrics)),
    );
    let report = pipeline.run(&request).unwrap();

    let written = codec::decode(&report.results_path, AddressEncoding::Text).unwrap();
    assert_eq!(written, addrs(&values[..64]));
    assert_eq!(report.unique, written.len());
}
