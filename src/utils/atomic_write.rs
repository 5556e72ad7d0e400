//! Durable CSV artifact writes.
//!
//! Rows are written to a `.tmp` sibling, synced, and renamed over the target,
//! so readers only ever observe a complete file under the final name.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Temporary sibling used while `path` is being written
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write a headed CSV file atomically. `write_rows` receives a writer that has
/// already emitted `header`.
pub fn write_csv_atomically<H, F>(path: &Path, header: H, write_rows: F) -> Result<(), WriteError>
where
    H: IntoIterator,
    H::Item: AsRef<[u8]>,
    F: FnOnce(&mut csv::Writer<File>) -> Result<(), WriteError>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let temp_path = temp_path_for(path);
    let result = write_then_rename(path, &temp_path, header, write_rows);

    if result.is_err() && temp_path.is_file() {
        if let Err(e) = fs::remove_file(&temp_path) {
            warn!(path = %temp_path.display(), error = %e, "Failed to remove partial temp file");
        }
    }

    result
}

fn write_then_rename<H, F>(
    path: &Path,
    temp_path: &Path,
    header: H,
    write_rows: F,
) -> Result<(), WriteError>
where
    H: IntoIterator,
    H::Item: AsRef<[u8]>,
    F: FnOnce(&mut csv::Writer<File>) -> Result<(), WriteError>,
{
    let file = File::create(temp_path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    writer.write_record(header)?;
    write_rows(&mut writer)?;

    let file = writer
        .into_inner()
        .map_err(|e| WriteError::Io(e.into_error()))?;
    file.sync_all()?;

    fs::rename(temp_path, path)?;
    Ok(())
}
