use super::batcher::Batch;
use super::cancellation::CancellationFlag;
use super::run_reporter::RunReporter;
use crate::models::{FacilityRecord, ResultRecord};
use crate::resolver::{AddressResolver, LookupOutcome};
use futures::stream::{self, StreamExt};
use std::sync::Arc;

/// What became of one batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// One result per record, in record order
    Completed(Vec<ResultRecord>),
    /// Cancellation was observed before every record was looked up; the
    /// partial results are discarded
    Cancelled { resolved: usize },
}

/// Resolves every record of a batch through the resolver.
///
/// With a concurrency of 1 lookups run strictly one after another. Higher
/// values allow that many lookups in flight at once; results are still
/// returned in record order. Pacing against the external service is the
/// resolver's concern.
pub struct BatchProcessor {
    resolver: Arc<dyn AddressResolver>,
    concurrency: usize,
}

impl std::fmt::Debug for BatchProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchProcessor")
            .field("resolver", &self.resolver.name())
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

impl BatchProcessor {
    pub fn new(resolver: Arc<dyn AddressResolver>, concurrency: usize) -> Self {
        Self {
            resolver,
            concurrency: concurrency.max(1),
        }
    }

    pub fn resolver_name(&self) -> &str {
        self.resolver.name()
    }

    pub async fn process(
        &self,
        batch: &Batch<'_>,
        reporter: &RunReporter,
        cancellation: &CancellationFlag,
    ) -> BatchOutcome {
        let results: Vec<Option<ResultRecord>> = stream::iter(batch.records)
            .map(|record| async move {
                if cancellation.is_cancelled() {
                    return None;
                }
                Some(self.resolve(record, reporter).await)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let resolved = results.iter().filter(|r| r.is_some()).count();
        if resolved < results.len() {
            return BatchOutcome::Cancelled { resolved };
        }
        BatchOutcome::Completed(results.into_iter().flatten().collect())
    }

    async fn resolve(&self, record: &FacilityRecord, reporter: &RunReporter) -> ResultRecord {
        let outcome = self.resolver.lookup(&record.query()).await;
        reporter.lookup_completed(record, &outcome);

        match outcome {
            LookupOutcome::Success(address) => ResultRecord::resolved(record, address),
            LookupOutcome::Failure { reason } => ResultRecord::failed(record, reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FacilityQuery, ResolvedAddress, ResultStatus};
    use crate::resolver::NullResolver;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn records(n: usize) -> Vec<FacilityRecord> {
        (1..=n)
            .map(|i| FacilityRecord::new(i.to_string(), format!("F{i}"), "県", "市", "", "", ""))
            .collect()
    }

    /// Fails every facility whose name ends in an even digit
    struct EvenFails;

    #[async_trait]
    impl AddressResolver for EvenFails {
        async fn lookup(&self, query: &FacilityQuery<'_>) -> LookupOutcome {
            let n: usize = query.facility_name[1..].parse().unwrap();
            if n % 2 == 0 {
                LookupOutcome::failure("rate limited")
            } else {
                LookupOutcome::Success(ResolvedAddress::new("1", "c", query.facility_name))
            }
        }

        fn name(&self) -> &str {
            "even-fails"
        }
    }

    /// Earlier records sleep longer, so completion order is reversed
    struct SlowFirst {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    #[async_trait]
    impl AddressResolver for SlowFirst {
        async fn lookup(&self, query: &FacilityQuery<'_>) -> LookupOutcome {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            let n: u64 = query.facility_name[1..].parse().unwrap();
            tokio::time::sleep(Duration::from_millis(5 * (10 - n))).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            LookupOutcome::Success(ResolvedAddress::new("", "", query.facility_name))
        }

        fn name(&self) -> &str {
            "slow-first"
        }
    }

    #[tokio::test]
    async fn test_failures_become_error_results() {
        let records = records(4);
        let batch = Batch { index: 1, records: &records };
        let processor = BatchProcessor::new(Arc::new(EvenFails), 1);
        let reporter = RunReporter::new();

        let BatchOutcome::Completed(results) =
            processor.process(&batch, &reporter, &CancellationFlag::new()).await
        else {
            panic!("batch should complete");
        };

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].status(), ResultStatus::Success);
        assert_eq!(results[1].status(), ResultStatus::Error);
        assert_eq!(results[1].error_message(), Some("rate limited"));
        assert_eq!(reporter.snapshot().lookups_failed, 2);
    }

    #[tokio::test]
    async fn test_concurrent_lookups_preserve_record_order() {
        let records = records(6);
        let batch = Batch { index: 1, records: &records };
        let resolver = Arc::new(SlowFirst {
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        });
        let processor = BatchProcessor::new(resolver.clone(), 3);

        let BatchOutcome::Completed(results) = processor
            .process(&batch, &RunReporter::new(), &CancellationFlag::new())
            .await
        else {
            panic!("batch should complete");
        };

        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);
        let max = resolver.max_in_flight.load(Ordering::SeqCst);
        assert!(max > 1 && max <= 3, "max in flight was {max}");
    }

    #[tokio::test]
    async fn test_sequential_by_default() {
        let records = records(3);
        let batch = Batch { index: 1, records: &records };
        let resolver = Arc::new(SlowFirst {
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        });
        let processor = BatchProcessor::new(resolver.clone(), 1);

        processor
            .process(&batch, &RunReporter::new(), &CancellationFlag::new())
            .await;
        assert_eq!(resolver.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_resolves_nothing() {
        let records = records(3);
        let batch = Batch { index: 1, records: &records };
        let processor = BatchProcessor::new(Arc::new(NullResolver), 1);
        let cancellation = CancellationFlag::new();
        cancellation.cancel();

        let outcome = processor
            .process(&batch, &RunReporter::new(), &cancellation)
            .await;
        assert_eq!(outcome, BatchOutcome::Cancelled { resolved: 0 });
    }
}
