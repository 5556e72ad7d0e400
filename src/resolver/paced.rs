use super::{AddressResolver, LookupOutcome, RateLimiter};
use crate::models::FacilityQuery;
use async_trait::async_trait;
use std::time::Duration;

/// Resolver adapter that owns the rate-limit budget of the wrapped resolver.
/// Every lookup first waits for a permit, whichever task issues it.
#[derive(Debug)]
pub struct PacedResolver<R> {
    inner: R,
    limiter: RateLimiter,
}

impl<R: AddressResolver> PacedResolver<R> {
    pub fn new(inner: R, min_interval: Duration) -> Self {
        Self {
            inner,
            limiter: RateLimiter::new(min_interval),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.limiter.min_interval()
    }
}

#[async_trait]
impl<R: AddressResolver> AddressResolver for PacedResolver<R> {
    async fn lookup(&self, query: &FacilityQuery<'_>) -> LookupOutcome {
        self.limiter.wait().await;
        self.inner.lookup(query).await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
