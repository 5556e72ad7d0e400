use crate::config::ColumnMapping;
use serde::{Deserialize, Serialize};

/// One row of the input roster.
///
/// The typed fields are the columns the pipeline interprets; `cells` keeps the
/// whole source row in header order so the final table can reproduce every
/// original column verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub id: String,
    pub facility_name: String,
    pub prefecture: String,
    pub city: String,
    pub postal_code: String,
    pub street_address: String,
    pub normalized_address: String,
    cells: Vec<String>,
}

impl FacilityRecord {
    pub fn new(
        id: impl Into<String>,
        facility_name: impl Into<String>,
        prefecture: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        street_address: impl Into<String>,
        normalized_address: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            facility_name: facility_name.into(),
            prefecture: prefecture.into(),
            city: city.into(),
            postal_code: postal_code.into(),
            street_address: street_address.into(),
            normalized_address: normalized_address.into(),
            cells: Vec::new(),
        }
    }

    /// Attach the raw source row
    pub fn with_cells(mut self, cells: Vec<String>) -> Self {
        self.cells = cells;
        self
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Identity handed to the resolver
    pub fn query(&self) -> FacilityQuery<'_> {
        FacilityQuery {
            facility_name: &self.facility_name,
            prefecture: &self.prefecture,
            locality: &self.city,
        }
    }

    /// Cells in `ColumnMapping::required()` order, used when a record was
    /// built in code rather than loaded from a file
    fn mapped_cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.normalized_address.clone(),
            self.facility_name.clone(),
            self.postal_code.clone(),
            self.prefecture.clone(),
            self.city.clone(),
            self.street_address.clone(),
        ]
    }
}

/// Facility identity as seen by a resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacilityQuery<'a> {
    pub facility_name: &'a str,
    pub prefecture: &'a str,
    pub locality: &'a str,
}

impl FacilityQuery<'_> {
    /// Free-text query for search based resolvers: `"{name} {prefecture} {city}"`
    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.facility_name, self.prefecture, self.locality)
    }
}

/// A loaded input table: header plus records in file order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    headers: Vec<String>,
    records: Vec<FacilityRecord>,
}

impl Roster {
    pub fn new(headers: Vec<String>, records: Vec<FacilityRecord>) -> Self {
        Self { headers, records }
    }

    /// Build a roster from records constructed in code. The header is the
    /// default required column set and every record's cells are derived from
    /// its typed fields.
    pub fn from_records(records: Vec<FacilityRecord>) -> Self {
        let headers = ColumnMapping::default()
            .required()
            .iter()
            .map(|h| h.to_string())
            .collect();
        let records = records
            .into_iter()
            .map(|record| {
                let cells = record.mapped_cells();
                record.with_cells(cells)
            })
            .collect();
        Self { headers, records }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[FacilityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
