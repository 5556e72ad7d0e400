use async_trait::async_trait;
use facility_address::models::{FacilityQuery, ResolvedAddress};
use facility_address::orchestration::CancellationFlag;
use facility_address::resolver::{AddressResolver, LookupOutcome};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Always fails with the same reason
pub struct FailingResolver {
    pub reason: String,
}

impl FailingResolver {
    pub fn rate_limited() -> Self {
        Self {
            reason: "rate limited".to_string(),
        }
    }
}

#[async_trait]
impl AddressResolver for FailingResolver {
    async fn lookup(&self, _query: &FacilityQuery<'_>) -> LookupOutcome {
        LookupOutcome::failure(self.reason.clone())
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Returns a synthetic new address derived from the facility name
pub struct CannedResolver;

#[async_trait]
impl AddressResolver for CannedResolver {
    async fn lookup(&self, query: &FacilityQuery<'_>) -> LookupOutcome {
        LookupOutcome::Success(ResolvedAddress::new(
            "999-0000",
            query.locality,
            format!("新住所 {}", query.facility_name),
        ))
    }

    fn name(&self) -> &str {
        "canned"
    }
}

/// Records the facility names it was asked about, in call order
#[derive(Default)]
pub struct RecordingResolver {
    pub calls: Mutex<Vec<String>>,
}

#[async_trait]
impl AddressResolver for RecordingResolver {
    async fn lookup(&self, query: &FacilityQuery<'_>) -> LookupOutcome {
        self.calls.lock().push(query.facility_name.to_string());
        LookupOutcome::Success(ResolvedAddress::default())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Raises the cancellation flag once `after` lookups have completed
pub struct CancelAfter {
    pub after: usize,
    pub flag: CancellationFlag,
    pub count: AtomicUsize,
}

impl CancelAfter {
    pub fn new(after: usize, flag: CancellationFlag) -> Self {
        Self {
            after,
            flag,
            count: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AddressResolver for CancelAfter {
    async fn lookup(&self, _query: &FacilityQuery<'_>) -> LookupOutcome {
        if self.count.fetch_add(1, Ordering::SeqCst) + 1 >= self.after {
            self.flag.cancel();
        }
        LookupOutcome::Success(ResolvedAddress::default())
    }

    fn name(&self) -> &str {
        "cancel-after"
    }
}
