use crate::models::ResultRecord;

/// Append-only log of every result produced so far in a run.
///
/// Results are appended once per completed batch, so a snapshot always holds
/// whole batches in roster order and each checkpoint is a superset of the one
/// before it.
#[derive(Debug, Clone, Default)]
pub struct ResultLog {
    entries: Vec<ResultRecord>,
    batches: usize,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_batch(&mut self, results: Vec<ResultRecord>) {
        self.entries.extend(results);
        self.batches += 1;
    }

    pub fn snapshot(&self) -> &[ResultRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of batches appended
    pub fn batches(&self) -> usize {
        self.batches
    }

    pub fn failure_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|r| !r.status().is_success())
            .count()
    }

    pub fn into_inner(self) -> Vec<ResultRecord> {
        self.entries
    }
}
