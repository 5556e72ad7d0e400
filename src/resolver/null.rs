use super::{AddressResolver, LookupOutcome};
use crate::models::{FacilityQuery, ResolvedAddress};
use async_trait::async_trait;

/// Placeholder lookup: always answers, never finds a new address. Useful for
/// dry runs that exercise batching, checkpoints and the merge end to end.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

#[async_trait]
impl AddressResolver for NullResolver {
    async fn lookup(&self, _query: &FacilityQuery<'_>) -> LookupOutcome {
        LookupOutcome::Success(ResolvedAddress::default())
    }

    fn name(&self) -> &str {
        "null"
    }
}
