//! Cooperative cancellation

use crate::common::*;
use facility_address::config::EnricherConfig;
use facility_address::orchestration::{CancellationFlag, EnrichmentPipeline};
use facility_address::PipelineError;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn cancel_mid_batch_keeps_completed_checkpoints() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("updated.csv");
    let flag = CancellationFlag::new();

    let mut config = EnricherConfig::default();
    config.pipeline.batch_size = 4;
    // Cancel during the sixth lookup, i.e. inside batch 2
    let resolver = Arc::new(CancelAfter::new(6, flag.clone()));
    let pipeline = EnrichmentPipeline::new(&config, resolver)
        .unwrap()
        .with_cancellation(flag);

    let err = pipeline.run_roster(&roster(12), &output).await.unwrap_err();

    let expected = pipeline.checkpoint_writer().path_for(&output, 1);
    match &err {
        PipelineError::Cancelled { last_checkpoint } => {
            assert_eq!(last_checkpoint.as_ref(), Some(&expected))
        }
        other => panic!("expected cancellation, got {other:?}"),
    }
    assert_eq!(err.exit_code(), 130);
    assert_eq!(ids_in_csv(&expected).len(), 4);
    assert!(!pipeline.checkpoint_writer().path_for(&output, 2).exists());
    assert!(!output.exists());
}

#[tokio::test]
async fn cancel_on_batch_boundary_reports_that_batch() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("updated.csv");
    let flag = CancellationFlag::new();

    let mut config = EnricherConfig::default();
    config.pipeline.batch_size = 4;
    let resolver = Arc::new(CancelAfter::new(8, flag.clone()));
    let pipeline = EnrichmentPipeline::new(&config, resolver)
        .unwrap()
        .with_cancellation(flag);

    let err = pipeline.run_roster(&roster(12), &output).await.unwrap_err();

    let expected = pipeline.checkpoint_writer().path_for(&output, 2);
    assert!(matches!(
        err,
        PipelineError::Cancelled { last_checkpoint: Some(ref p) } if *p == expected
    ));
    assert_eq!(ids_in_csv(&expected).len(), 8);
}

