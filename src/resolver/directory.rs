use super::{AddressResolver, LookupOutcome};
use crate::models::{FacilityQuery, ResolvedAddress};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

pub const NO_MATCH_REASON: &str = "no matching directory entry";
pub const AMBIGUOUS_MATCH_REASON: &str = "ambiguous directory entry";

#[derive(Debug, Error)]
pub enum DirectoryLoadError {
    #[error("Failed to open directory '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Malformed directory row {line}: {source}")]
    Row {
        line: u64,
        #[source]
        source: csv::Error,
    },
}

/// One known current address
#[derive(Debug, Clone, Deserialize)]
struct DirectoryEntry {
    facility_name: String,
    prefecture: String,
    postal_code: String,
    city: String,
    address: String,
}

/// Resolves facilities against an in-memory directory of known current
/// addresses, keyed by `(facility_name, prefecture)`. A name that is unique
/// across prefectures also matches on name alone.
#[derive(Debug, Default)]
pub struct DirectoryResolver {
    by_name_and_prefecture: HashMap<(String, String), ResolvedAddress>,
    by_name: HashMap<String, Vec<ResolvedAddress>>,
}

impl DirectoryResolver {
    /// Load a directory CSV with headers
    /// `facility_name,prefecture,postal_code,city,address`
    pub fn from_csv_path(path: &Path) -> Result<Self, DirectoryLoadError> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|source| DirectoryLoadError::Open {
                path: path.display().to_string(),
                source,
            })?;
        let resolver = Self::from_reader(reader)?;

        info!(
            path = %path.display(),
            entries = resolver.len(),
            "Loaded address directory"
        );
        Ok(resolver)
    }

    fn from_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Self, DirectoryLoadError> {
        let mut resolver = Self::default();
        for row in reader.deserialize::<DirectoryEntry>() {
            let entry = row.map_err(|source| DirectoryLoadError::Row {
                line: source.position().map_or(0, |p| p.line()),
                source,
            })?;
            resolver.insert(
                entry.facility_name,
                entry.prefecture,
                ResolvedAddress::new(entry.postal_code, entry.city, entry.address),
            );
        }
        Ok(resolver)
    }

    pub fn insert(
        &mut self,
        facility_name: impl Into<String>,
        prefecture: impl Into<String>,
        address: ResolvedAddress,
    ) {
        let facility_name = facility_name.into();
        self.by_name
            .entry(facility_name.clone())
            .or_default()
            .push(address.clone());
        self.by_name_and_prefecture
            .insert((facility_name, prefecture.into()), address);
    }

    pub fn len(&self) -> usize {
        self.by_name_and_prefecture.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name_and_prefecture.is_empty()
    }

    fn find(&self, query: &FacilityQuery<'_>) -> LookupOutcome {
        let key = (
            query.facility_name.to_string(),
            query.prefecture.to_string(),
        );
        if let Some(address) = self.by_name_and_prefecture.get(&key) {
            return LookupOutcome::Success(address.clone());
        }

        match self.by_name.get(query.facility_name).map(Vec::as_slice) {
            Some([only]) => LookupOutcome::Success(only.clone()),
            Some([_, _, ..]) => LookupOutcome::failure(AMBIGUOUS_MATCH_REASON),
            _ => LookupOutcome::failure(NO_MATCH_REASON),
        }
    }
}

#[async_trait]
impl AddressResolver for DirectoryResolver {
    async fn lookup(&self, query: &FacilityQuery<'_>) -> LookupOutcome {
        let outcome = self.find(query);
        debug!(
            query = %query.search_text(),
            found = outcome.is_success(),
            "Directory lookup"
        );
        outcome
    }

    fn name(&self) -> &str {
        "directory"
    }
}
