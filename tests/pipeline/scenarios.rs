//! End-to-end runs over roster files

use crate::common::*;
use facility_address::config::EnricherConfig;
use facility_address::models::ResultStatus;
use facility_address::orchestration::{CheckpointWriter, EnrichmentPipeline};
use facility_address::resolver::{AddressResolver, NullResolver};
use facility_address::PipelineError;
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;

fn pipeline(batch_size: usize, resolver: Arc<dyn AddressResolver>) -> EnrichmentPipeline {
    let mut config = EnricherConfig::default();
    config.pipeline.batch_size = batch_size;
    EnrichmentPipeline::new(&config, resolver).unwrap()
}

#[tokio::test]
async fn run_with_120_records_writes_three_cumulative_checkpoints() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_roster_csv(temp_dir.path(), 120);
    let output = temp_dir.path().join("out").join("updated.csv");

    let report = pipeline(50, Arc::new(CannedResolver))
        .run(&input, &output)
        .await
        .unwrap();

    let summary = &report.summary;
    assert_eq!(summary.total_records, 120);
    assert_eq!(summary.batches, 3);
    assert_eq!(summary.checkpoints_written.len(), 3);
    assert!(summary.checkpoint_failures.is_empty());
    assert_eq!(summary.updated, 120);
    assert!(summary.duration_ms() >= 0);

    let sizes: Vec<usize> = summary
        .checkpoints_written
        .iter()
        .map(|path| ids_in_csv(path).len())
        .collect();
    assert_eq!(sizes, vec![50, 100, 120]);
    assert_eq!(
        summary.checkpoints_written[2],
        temp_dir.path().join("out").join("updated.csv.interim_3")
    );
}

#[tokio::test]
async fn final_table_keeps_original_columns_and_appends_new_ones() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_roster_csv(temp_dir.path(), 3);
    let output = temp_dir.path().join("updated.csv");

    pipeline(2, Arc::new(CannedResolver))
        .run(&input, &output)
        .await
        .unwrap();

    let mut reader = csv::Reader::from_path(&output).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(
        headers.join(","),
        format!("{HEADER},new_postal_code,new_city,new_address")
    );

    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[1][2], "施設2");
    assert_eq!(&rows[1][6], "旧住所2");
    assert_eq!(&rows[1][7], "999-0000");
    assert_eq!(&rows[1][8], "千代田区");
    assert_eq!(&rows[1][9], "新住所 施設2");
}

#[tokio::test]
async fn always_failing_resolver_still_completes_the_run() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_roster_csv(temp_dir.path(), 7);
    let output = temp_dir.path().join("updated.csv");

    let report = pipeline(3, Arc::new(FailingResolver::rate_limited()))
        .run(&input, &output)
        .await
        .unwrap();

    assert_eq!(report.summary.updated, 0);
    assert_eq!(report.summary.not_updated, 7);
    assert_eq!(report.summary.lookup_failures, 7);
    assert_eq!(report.table.len(), 7);
    for result in &report.results {
        assert_eq!(result.status(), ResultStatus::Error);
        assert_eq!(result.error_message(), Some("rate limited"));
    }
    for row in report.table.rows() {
        assert_eq!(row.status, Some(ResultStatus::Error));
        assert_eq!(row.error_message.as_deref(), Some("rate limited"));
        assert_eq!(row.merged_cells(), ["", "", ""]);
    }

    let last = report.summary.last_checkpoint().unwrap();
    let contents = std::fs::read_to_string(last).unwrap();
    assert!(contents.lines().skip(1).all(|l| l.ends_with(",,,,rate limited,error")));
}

#[tokio::test]
async fn missing_postal_code_column_fails_before_any_checkpoint() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("medical_facilities.csv");
    std::fs::write(
        &input,
        "ID,address_normalized,医療機関名,都道府県,市区町村,address\n1,x,施設1,東京都,千代田区,旧住所1\n",
    )
    .unwrap();
    let output = temp_dir.path().join("updated.csv");
    let pipeline = pipeline(50, Arc::new(NullResolver));

    let err = pipeline.run(&input, &output).await.unwrap_err();

    match &err {
        PipelineError::Schema { missing } => assert_eq!(missing, &vec!["郵便番号".to_string()]),
        other => panic!("expected schema error, got {other:?}"),
    }
    assert!(err.to_string().contains("郵便番号"));
    assert!(pipeline.checkpoint_writer().latest(&output).is_none());
    assert!(!output.exists());
}

#[tokio::test]
async fn empty_success_is_distinct_from_failure() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_roster_csv(temp_dir.path(), 2);
    let output = temp_dir.path().join("updated.csv");

    let report = pipeline(50, Arc::new(NullResolver))
        .run(&input, &output)
        .await
        .unwrap();

    for result in &report.results {
        assert_eq!(result.status(), ResultStatus::Success);
        assert!(result.new_address().unwrap().is_empty());
        assert_eq!(result.error_message(), None);
    }
    let checkpoint = CheckpointWriter::load(report.summary.last_checkpoint().unwrap()).unwrap();
    assert_eq!(checkpoint, report.results);
    assert!(report.table.rows().iter().all(|r| r.status == Some(ResultStatus::Success)));
}

#[tokio::test]
async fn padded_headers_survive_into_the_final_table() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("medical_facilities.csv");
    std::fs::write(
        &input,
        " ID ,address_normalized,医療機関名,郵便番号,都道府県,市区町村,address \n\
         1,x,施設1,100-0001,東京都,千代田区,旧住所1\n",
    )
    .unwrap();
    let output = temp_dir.path().join("updated.csv");

    let report = pipeline(50, Arc::new(CannedResolver))
        .run(&input, &output)
        .await
        .unwrap();
    assert_eq!(report.summary.updated, 1);

    let mut reader = csv::Reader::from_path(&output).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], " ID ");
    assert_eq!(&headers[6], "address ");
    assert_eq!(&headers[7], "new_postal_code");
}

#[tokio::test]
async fn every_roster_id_appears_in_exactly_one_result() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_roster_csv(temp_dir.path(), 37);
    let output = temp_dir.path().join("updated.csv");

    let report = pipeline(5, Arc::new(CannedResolver))
        .run(&input, &output)
        .await
        .unwrap();

    let roster_ids: HashSet<String> = (1..=37).map(|i| i.to_string()).collect();
    let result_ids: Vec<&str> = report.results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(result_ids.len(), 37);
    let unique: HashSet<String> = result_ids.iter().map(|s| s.to_string()).collect();
    assert_eq!(unique, roster_ids);
    assert_eq!(report.summary.merge.unmatched_records, 0);
    assert!(report.summary.merge.unmatched_results.is_empty());
    assert_eq!(ids_in_csv(&output).len(), 37);
}

#[tokio::test]
async fn lookups_follow_roster_order() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("updated.csv");
    let resolver = Arc::new(RecordingResolver::default());

    pipeline(4, resolver.clone())
        .run_roster(&roster(10), &output)
        .await
        .unwrap();

    let expected: Vec<String> = (1..=10).map(|i| format!("施設{i}")).collect();
    assert_eq!(*resolver.calls.lock(), expected);
}

#[tokio::test]
async fn concurrent_lookups_produce_the_same_table() {
    let temp_dir = TempDir::new().unwrap();
    let roster = roster(23);

    let sequential = pipeline(10, Arc::new(CannedResolver))
        .run_roster(&roster, &temp_dir.path().join("a.csv"))
        .await
        .unwrap();

    let mut config = EnricherConfig::default();
    config.pipeline.batch_size = 10;
    config.pipeline.lookup_concurrency = 4;
    let concurrent = EnrichmentPipeline::new(&config, Arc::new(CannedResolver))
        .unwrap()
        .run_roster(&roster, &temp_dir.path().join("b.csv"))
        .await
        .unwrap();

    assert_eq!(sequential.table, concurrent.table);
    assert_eq!(sequential.results, concurrent.results);
}
