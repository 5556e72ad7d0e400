use crate::config::ColumnMapping;
use crate::error::{PipelineError, Result};
use crate::models::{FacilityRecord, Roster};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

const UTF8_BOM: char = '\u{feff}';

/// Parses the facility roster and fails fast when required columns are absent
#[derive(Debug, Clone, Default)]
pub struct RosterLoader {
    columns: ColumnMapping,
}

/// Positions of the required columns within the header
struct ColumnIndex {
    id: usize,
    normalized_address: usize,
    facility_name: usize,
    postal_code: usize,
    prefecture: usize,
    city: usize,
    street_address: usize,
}

impl RosterLoader {
    pub fn new(columns: ColumnMapping) -> Self {
        Self { columns }
    }

    pub fn load_path(&self, path: &Path) -> Result<Roster> {
        let file = File::open(path).map_err(|e| PipelineError::input_read(path, e))?;
        let roster = self.load_reader(file, path)?;

        info!(
            path = %path.display(),
            records = roster.len(),
            columns = roster.headers().len(),
            "Loaded facility roster"
        );
        Ok(roster)
    }

    /// Parse a roster from any reader; `source` is only used in error messages
    pub fn load_reader<R: Read>(&self, reader: R, source: &Path) -> Result<Roster> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| PipelineError::input_read(source, e))?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let h = if i == 0 { h.trim_start_matches(UTF8_BOM) } else { h };
                h.to_string()
            })
            .collect();

        let index = self.index_columns(&headers)?;

        let mut records = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut duplicate_ids = 0usize;

        for row in reader.records() {
            let row = row.map_err(|e| PipelineError::input_read(source, e))?;
            let cells: Vec<String> = row.iter().map(str::to_string).collect();
            let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();

            let record = FacilityRecord::new(
                cell(index.id),
                cell(index.facility_name),
                cell(index.prefecture),
                cell(index.city),
                cell(index.postal_code),
                cell(index.street_address),
                cell(index.normalized_address),
            );

            if !seen_ids.insert(record.id.clone()) {
                duplicate_ids += 1;
            }
            records.push(record.with_cells(cells));
        }

        if duplicate_ids > 0 {
            warn!(
                source = %source.display(),
                duplicate_ids,
                "Roster contains duplicate ids; every row sharing an id receives the first result for it and later lookups for that id are discarded as duplicate results"
            );
        }

        Ok(Roster::new(headers, records))
    }

    fn index_columns(&self, headers: &[String]) -> Result<ColumnIndex> {
        // headers are kept verbatim for output, matching ignores padding
        let position = |name: &str| headers.iter().position(|h| h.trim() == name.trim());

        let missing: Vec<String> = self
            .columns
            .required()
            .into_iter()
            .filter(|&name| position(name).is_none())
            .map(str::to_string)
            .collect();

        if !missing.is_empty() {
            return Err(PipelineError::Schema { missing });
        }

        let at = |name: &str| position(name).unwrap_or_default();
        Ok(ColumnIndex {
            id: at(&self.columns.id),
            normalized_address: at(&self.columns.normalized_address),
            facility_name: at(&self.columns.facility_name),
            postal_code: at(&self.columns.postal_code),
            prefecture: at(&self.columns.prefecture),
            city: at(&self.columns.city),
            street_address: at(&self.columns.street_address),
        })
    }
}
