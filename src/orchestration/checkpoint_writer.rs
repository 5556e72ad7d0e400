//! # Checkpoint Writer
//!
//! Persists the cumulative result log after every batch to
//! `<output>.<suffix>_<n>`. Each artifact is written to a temporary sibling and
//! renamed into place, so a reader never observes a half-written checkpoint.
//! A failed write is reported to the caller and does not stop the run.

use super::run_reporter::RunReporter;
use crate::constants::{checkpoint_columns, DEFAULT_INTERIM_SUFFIX};
use crate::models::{ResolutionDetail, ResolvedAddress, ResultRecord, ResultStatus};
use crate::utils::{write_csv_atomically, WriteError};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Failed to write checkpoint {batch_index} to '{}': {source}", path.display())]
pub struct CheckpointWriteError {
    pub batch_index: usize,
    pub path: PathBuf,
    #[source]
    pub source: WriteError,
}

#[derive(Debug, Error)]
pub enum CheckpointReadError {
    #[error("Failed to read checkpoint '{path}': {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid status '{value}' in checkpoint row for id '{id}'")]
    InvalidStatus { id: String, value: String },
}

/// On-disk row layout, field order matching `checkpoint_columns::ALL`
#[derive(Debug, Serialize, Deserialize)]
struct CheckpointRow {
    id: String,
    medical_name: String,
    old_postal_code: String,
    old_city: String,
    old_address: String,
    new_postal_code: String,
    new_city: String,
    new_address: String,
    error_message: String,
    status: String,
}

impl From<&ResultRecord> for CheckpointRow {
    fn from(result: &ResultRecord) -> Self {
        let address = result.new_address().cloned().unwrap_or_default();
        Self {
            id: result.id.clone(),
            medical_name: result.facility_name.clone(),
            old_postal_code: result.old_postal_code.clone(),
            old_city: result.old_city.clone(),
            old_address: result.old_address.clone(),
            new_postal_code: address.postal_code,
            new_city: address.city,
            new_address: address.street_address,
            error_message: result.error_message().unwrap_or_default().to_string(),
            status: result.status().to_string(),
        }
    }
}

impl TryFrom<CheckpointRow> for ResultRecord {
    type Error = CheckpointReadError;

    fn try_from(row: CheckpointRow) -> Result<Self, Self::Error> {
        let status: ResultStatus =
            row.status
                .parse()
                .map_err(|_| CheckpointReadError::InvalidStatus {
                    id: row.id.clone(),
                    value: row.status.clone(),
                })?;
        let detail = match status {
            ResultStatus::Success => ResolutionDetail::Resolved(ResolvedAddress::new(
                row.new_postal_code,
                row.new_city,
                row.new_address,
            )),
            ResultStatus::Error => ResolutionDetail::Failed {
                error_message: row.error_message,
            },
        };
        Ok(Self {
            id: row.id,
            facility_name: row.medical_name,
            old_postal_code: row.old_postal_code,
            old_city: row.old_city,
            old_address: row.old_address,
            detail,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CheckpointWriter {
    suffix: String,
}

impl Default for CheckpointWriter {
    fn default() -> Self {
        Self::new(DEFAULT_INTERIM_SUFFIX)
    }
}

impl CheckpointWriter {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    /// `<output>.<suffix>_<batch_index>`, next to the final output
    pub fn path_for(&self, output: &Path, batch_index: usize) -> PathBuf {
        let mut name = output
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(format!(".{}_{}", self.suffix, batch_index));
        output.with_file_name(name)
    }

    /// Write the full cumulative log as checkpoint `batch_index`. Success and
    /// failure are both reported; the error is returned for the caller to
    /// record.
    pub fn flush(
        &self,
        results: &[ResultRecord],
        batch_index: usize,
        output: &Path,
        reporter: &RunReporter,
    ) -> Result<PathBuf, CheckpointWriteError> {
        let path = self.path_for(output, batch_index);
        let written = write_csv_atomically(&path, checkpoint_columns::ALL, |writer| {
            for result in results {
                writer.serialize(CheckpointRow::from(result))?;
            }
            Ok(())
        });

        match written {
            Ok(()) => {
                reporter.checkpoint_written(batch_index, &path, results.len());
                Ok(path)
            }
            Err(source) => {
                let error = CheckpointWriteError {
                    batch_index,
                    path,
                    source,
                };
                reporter.checkpoint_failed(batch_index, &error.path, &error.to_string());
                Err(error)
            }
        }
    }

    /// Read a checkpoint back into result records
    pub fn load(path: &Path) -> Result<Vec<ResultRecord>, CheckpointReadError> {
        let csv_error = |source| CheckpointReadError::Csv {
            path: path.display().to_string(),
            source,
        };
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(csv_error)?;

        reader
            .deserialize::<CheckpointRow>()
            .map(|row| ResultRecord::try_from(row.map_err(csv_error)?))
            .collect()
    }

    /// Highest-numbered checkpoint present for `output`, if any
    pub fn latest(&self, output: &Path) -> Option<(usize, PathBuf)> {
        let prefix = format!(
            "{}.{}_",
            output.file_name()?.to_string_lossy(),
            self.suffix
        );
        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        std::fs::read_dir(&dir)
            .ok()?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name();
                let index = name
                    .to_str()?
                    .strip_prefix(&prefix)?
                    .parse::<usize>()
                    .ok()?;
                Some((index, self.path_for(output, index)))
            })
            .max_by_key(|(index, _)| *index)
    }
}
