//! # Address Resolvers
//!
//! The pipeline depends only on [`AddressResolver`]: given a facility identity
//! it returns either a resolved current address or a failure reason. How the
//! address is found (search engine, scraping, directory API) is the
//! implementation's business, as is honoring the external service's request
//! rate, which [`PacedResolver`] provides for any inner resolver.

pub mod directory;
pub mod null;
pub mod paced;
pub mod rate_limiter;

use crate::models::{FacilityQuery, ResolvedAddress};
use async_trait::async_trait;
use std::sync::Arc;

pub use directory::DirectoryResolver;
pub use null::NullResolver;
pub use paced::PacedResolver;
pub use rate_limiter::RateLimiter;

/// Result of a single lookup. Implementations convert their own errors into
/// `Failure`; a lookup never aborts the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Success(ResolvedAddress),
    Failure { reason: String },
}

impl LookupOutcome {
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

#[async_trait]
pub trait AddressResolver: Send + Sync {
    async fn lookup(&self, query: &FacilityQuery<'_>) -> LookupOutcome;

    /// Short name used in logs
    fn name(&self) -> &str;
}

#[async_trait]
impl<R: AddressResolver + ?Sized> AddressResolver for Arc<R> {
    async fn lookup(&self, query: &FacilityQuery<'_>) -> LookupOutcome {
        (**self).lookup(query).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
