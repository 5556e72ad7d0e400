use crate::error::{PipelineError, Result};
use crate::models::FacilityRecord;

/// A contiguous slice of the roster, processed and checkpointed as one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch<'a> {
    /// 1-based position among the run's batches
    pub index: usize,
    pub records: &'a [FacilityRecord],
}

impl Batch<'_> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Number of batches `partition` yields for `total` records
pub fn batch_count(total: usize, batch_size: usize) -> usize {
    if batch_size == 0 {
        return 0;
    }
    total.div_ceil(batch_size)
}

/// Split `records` into consecutive batches of `batch_size`. Every batch but
/// the last is full; concatenating the batches reproduces the input order.
/// An empty roster yields no batches.
pub fn partition(records: &[FacilityRecord], batch_size: usize) -> Result<Vec<Batch<'_>>> {
    if batch_size == 0 {
        return Err(PipelineError::invalid_batch_size(batch_size));
    }

    Ok(records
        .chunks(batch_size)
        .enumerate()
        .map(|(i, records)| Batch {
            index: i + 1,
            records,
        })
        .collect())
}
