//! Checkpoint artifacts across a run

use crate::common::*;
use facility_address::config::EnricherConfig;
use facility_address::orchestration::{CheckpointWriter, EnrichmentPipeline};
use facility_address::resolver::NullResolver;
use std::sync::Arc;
use tempfile::TempDir;

fn pipeline(batch_size: usize) -> EnrichmentPipeline {
    let mut config = EnricherConfig::default();
    config.pipeline.batch_size = batch_size;
    EnrichmentPipeline::new(&config, Arc::new(NullResolver)).unwrap()
}

#[tokio::test]
async fn each_checkpoint_extends_the_previous_one() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("updated.csv");

    let report = pipeline(4).run_roster(&roster(14), &output).await.unwrap();

    let snapshots: Vec<Vec<String>> = report
        .summary
        .checkpoints_written
        .iter()
        .map(|p| ids_in_csv(p))
        .collect();
    assert_eq!(snapshots.len(), 4);
    for pair in snapshots.windows(2) {
        assert!(pair[1].len() > pair[0].len());
        assert_eq!(&pair[1][..pair[0].len()], pair[0].as_slice());
    }
    assert_eq!(snapshots[3], ids_in_csv(&output));
}

#[tokio::test]
async fn failed_checkpoint_is_recorded_and_run_continues() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("updated.csv");
    let pipeline = pipeline(3);

    // Occupy the temporary path of checkpoint 1 so only that write fails
    let checkpoint_1 = pipeline.checkpoint_writer().path_for(&output, 1);
    let mut blocked = checkpoint_1.clone().into_os_string();
    blocked.push(".tmp");
    std::fs::create_dir_all(&blocked).unwrap();

    let report = pipeline.run_roster(&roster(7), &output).await.unwrap();

    let failures = &report.summary.checkpoint_failures;
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].batch_index, 1);
    assert_eq!(failures[0].path, checkpoint_1);
    assert_eq!(report.summary.checkpoints_written.len(), 2);
    assert!(!checkpoint_1.exists());

    // Checkpoint 2 still carries batch 1's results
    assert_eq!(ids_in_csv(&pipeline.checkpoint_writer().path_for(&output, 2)).len(), 6);
    assert_eq!(report.table.len(), 7);
    assert!(output.exists());
}

#[tokio::test]
async fn latest_checkpoint_is_discoverable_after_a_run() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("updated.csv");
    let pipeline = pipeline(2);

    let report = pipeline.run_roster(&roster(5), &output).await.unwrap();

    let (index, path) = pipeline.checkpoint_writer().latest(&output).unwrap();
    assert_eq!(index, 3);
    assert_eq!(CheckpointWriter::load(&path).unwrap(), report.results);
}

#[tokio::test]
async fn custom_suffix_names_checkpoints() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("updated.csv");
    let mut config = EnricherConfig::default();
    config.pipeline.batch_size = 10;
    config.pipeline.interim_suffix = "partial".to_string();
    let pipeline = EnrichmentPipeline::new(&config, Arc::new(NullResolver)).unwrap();

    let report = pipeline.run_roster(&roster(3), &output).await.unwrap();

    assert_eq!(
        report.summary.checkpoints_written,
        vec![temp_dir.path().join("updated.csv.partial_1")]
    );
}
