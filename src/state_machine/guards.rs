use super::errors::{GuardError, GuardResult};

/// Batches run in ascending order, each exactly once
pub fn check_next_batch(last_completed: usize, requested: usize, total: usize) -> GuardResult<()> {
    if requested > total {
        return Err(GuardError::BatchOutOfRange {
            batch: requested,
            total,
        });
    }
    if requested != last_completed + 1 {
        return Err(GuardError::OutOfOrderBatch {
            expected: last_completed + 1,
            actual: requested,
        });
    }
    Ok(())
}

/// Only the batch currently processing may complete
pub fn check_completing_batch(processing: usize, completed: usize) -> GuardResult<()> {
    if processing != completed {
        return Err(GuardError::MismatchedBatch {
            expected: processing,
            actual: completed,
        });
    }
    Ok(())
}

/// Merge runs once, after the last planned batch
pub fn check_all_batches_complete(completed: usize, total: usize) -> GuardResult<()> {
    if completed != total {
        return Err(GuardError::BatchesOutstanding { completed, total });
    }
    Ok(())
}
