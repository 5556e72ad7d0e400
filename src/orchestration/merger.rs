use crate::models::{EnrichedRow, FinalTable, ResultRecord, Roster};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Join bookkeeping reported alongside the final table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    /// Roster rows that found a result
    pub matched: usize,
    /// Roster rows with no result for their id
    pub unmatched_records: usize,
    /// Result ids with no roster row, in first-seen order
    pub unmatched_results: Vec<String>,
    /// Results ignored because an earlier result carried the same id
    pub duplicate_results: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub table: FinalTable,
    pub stats: MergeStats,
}

/// Left-join `results` onto `roster` by id.
///
/// Every roster row appears exactly once and in roster order. When several
/// results share an id the first one wins. Results whose id is not in the
/// roster are dropped and counted. Running the merge twice on the same input
/// yields the same table.
pub fn merge(roster: &Roster, results: &[ResultRecord]) -> MergeOutcome {
    let mut by_id: HashMap<&str, &ResultRecord> = HashMap::with_capacity(results.len());
    let mut duplicate_results = 0;
    for result in results {
        if by_id.contains_key(result.id.as_str()) {
            duplicate_results += 1;
        } else {
            by_id.insert(result.id.as_str(), result);
        }
    }

    let mut matched = 0;
    let rows: Vec<EnrichedRow> = roster
        .records()
        .iter()
        .map(|record| {
            let result = by_id.get(record.id.as_str());
            if result.is_some() {
                matched += 1;
            }
            EnrichedRow {
                cells: record.cells().to_vec(),
                status: result.map(|r| r.status()),
                new_address: result.and_then(|r| r.new_address().cloned()),
                error_message: result.and_then(|r| r.error_message().map(str::to_string)),
            }
        })
        .collect();

    let roster_ids: HashSet<&str> = roster.records().iter().map(|r| r.id.as_str()).collect();
    let mut seen = HashSet::new();
    let unmatched_results = results
        .iter()
        .map(|r| r.id.as_str())
        .filter(|id| !roster_ids.contains(id) && seen.insert(*id))
        .map(str::to_string)
        .collect();

    MergeOutcome {
        table: FinalTable::new(roster.headers().to_vec(), rows),
        stats: MergeStats {
            matched,
            unmatched_records: roster.len() - matched,
            unmatched_results,
            duplicate_results,
        },
    }
}
