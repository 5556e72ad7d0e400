use facility_address::models::{FacilityRecord, ResolvedAddress, ResultRecord, Roster};
use proptest::prelude::*;

/// Strategy for rosters of up to 200 records with unique ids
pub fn roster_strategy() -> impl Strategy<Value = Roster> {
    (0usize..200).prop_map(|n| Roster::from_records(super::facility_records(n)))
}

/// Strategy for valid batch sizes
pub fn batch_size_strategy() -> impl Strategy<Value = usize> {
    1usize..75
}

/// Strategy for result sets keyed by ids drawn partly from outside `1..=200`,
/// so some results never match and some ids repeat
pub fn results_strategy() -> impl Strategy<Value = Vec<ResultRecord>> {
    prop::collection::vec((1usize..260, any::<bool>()), 0..120).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(id, ok)| {
                let record = FacilityRecord::new(id.to_string(), "施設", "", "", "", "", "");
                if ok {
                    ResultRecord::resolved(&record, ResolvedAddress::new("1", "市", "町"))
                } else {
                    ResultRecord::failed(&record, "rate limited")
                }
            })
            .collect()
    })
}
