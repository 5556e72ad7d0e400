use super::result_record::{ResolvedAddress, ResultStatus};
use crate::constants::MERGED_COLUMNS;
use crate::utils::{write_csv_atomically, WriteError};
use std::path::Path;

/// One output row: the original cells plus the merged resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedRow {
    pub cells: Vec<String>,
    /// `None` when no result matched this row's id
    pub status: Option<ResultStatus>,
    /// Present only for matched rows whose lookup succeeded
    pub new_address: Option<ResolvedAddress>,
    /// Resolver failure reason for matched rows whose lookup failed
    pub error_message: Option<String>,
}

impl EnrichedRow {
    pub fn is_updated(&self) -> bool {
        self.new_address.is_some()
    }

    /// Merged column values in `MERGED_COLUMNS` order; empty when unresolved
    pub fn merged_cells(&self) -> [&str; 3] {
        match &self.new_address {
            Some(address) => [
                address.postal_code.as_str(),
                address.city.as_str(),
                address.street_address.as_str(),
            ],
            None => ["", "", ""],
        }
    }
}

/// Original roster left-joined with the results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalTable {
    headers: Vec<String>,
    rows: Vec<EnrichedRow>,
}

impl FinalTable {
    pub fn new(headers: Vec<String>, rows: Vec<EnrichedRow>) -> Self {
        Self { headers, rows }
    }

    /// Original headers followed by the merged columns
    pub fn headers(&self) -> Vec<&str> {
        self.headers
            .iter()
            .map(String::as_str)
            .chain(MERGED_COLUMNS)
            .collect()
    }

    pub fn rows(&self) -> &[EnrichedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn updated_count(&self) -> usize {
        self.rows.iter().filter(|row| row.is_updated()).count()
    }

    pub fn not_updated_count(&self) -> usize {
        self.len() - self.updated_count()
    }

    /// Persist as CSV at `path`
    pub fn write_csv(&self, path: &Path) -> Result<(), WriteError> {
        let width = self.headers.len();
        write_csv_atomically(path, self.headers(), |writer| {
            for row in &self.rows {
                let original = (0..width).map(|i| row.cells.get(i).map_or("", String::as_str));
                writer.write_record(original.chain(row.merged_cells()))?;
            }
            Ok(())
        })
    }
}
