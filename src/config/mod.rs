//! # Pipeline Configuration System
//!
//! YAML-based configuration with environment-specific overrides. Every section
//! has defaults matching the historical batch script, so a run without any
//! configuration file uses the standard roster layout and one-second pacing.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use facility_address::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let batch_size = manager.config().pipeline.batch_size;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use crate::constants::{self, input_columns};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring facility-config.yaml
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EnricherConfig {
    /// Batching, checkpointing and lookup scheduling
    pub pipeline: PipelineConfig,

    /// Resolver selection and pacing
    pub resolver: ResolverConfig,

    /// Input header mapping
    pub columns: ColumnMapping,

    /// Subscriber settings
    pub logging: LoggingConfig,

    /// Default artifact locations
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub batch_size: usize,
    /// Checkpoints are written to `<output>.<interim_suffix>_<n>`
    pub interim_suffix: String,
    /// Upper bound of in-flight lookups within one batch; 1 is strictly sequential
    pub lookup_concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: constants::DEFAULT_BATCH_SIZE,
            interim_suffix: constants::DEFAULT_INTERIM_SUFFIX.to_string(),
            lookup_concurrency: constants::DEFAULT_LOOKUP_CONCURRENCY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolverKind {
    /// Placeholder lookup that never finds anything new
    Null,
    /// Lookup against a CSV directory of known current addresses
    Directory,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub kind: ResolverKind,
    /// Minimum spacing between two consecutive lookups
    pub min_interval_ms: u64,
    pub directory_path: Option<PathBuf>,
}

impl ResolverConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            kind: ResolverKind::Null,
            min_interval_ms: constants::DEFAULT_MIN_INTERVAL_MS,
            directory_path: None,
        }
    }
}

/// Header names of the required input columns
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub id: String,
    pub normalized_address: String,
    pub facility_name: String,
    pub postal_code: String,
    pub prefecture: String,
    pub city: String,
    pub street_address: String,
}

impl ColumnMapping {
    /// Required header names in the order they are reported when missing
    pub fn required(&self) -> [&str; 7] {
        [
            self.id.as_str(),
            self.normalized_address.as_str(),
            self.facility_name.as_str(),
            self.postal_code.as_str(),
            self.prefecture.as_str(),
            self.city.as_str(),
            self.street_address.as_str(),
        ]
    }
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            id: input_columns::ID.to_string(),
            normalized_address: input_columns::NORMALIZED_ADDRESS.to_string(),
            facility_name: input_columns::FACILITY_NAME.to_string(),
            postal_code: input_columns::POSTAL_CODE.to_string(),
            prefecture: input_columns::PREFECTURE.to_string(),
            city: input_columns::CITY.to_string(),
            street_address: input_columns::STREET_ADDRESS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Explicit filter directive; derived from the environment when absent
    pub level: Option<String>,
    pub format: LogFormat,
    /// Optional file mirror of the log stream
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            format: LogFormat::Pretty,
            file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(constants::DEFAULT_INPUT_PATH),
            output_dir: PathBuf::from(constants::DEFAULT_OUTPUT_DIR),
        }
    }
}

impl EnricherConfig {
    /// Validate cross-field constraints that serde cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        if self.pipeline.batch_size == 0 {
            return Err(ConfigurationError::invalid_value(
                "pipeline.batch_size",
                "0",
                "batch size must be at least 1",
            ));
        }

        if self.pipeline.lookup_concurrency == 0 {
            return Err(ConfigurationError::invalid_value(
                "pipeline.lookup_concurrency",
                "0",
                "lookup concurrency must be at least 1",
            ));
        }

        if self.pipeline.interim_suffix.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "pipeline.interim_suffix",
                "",
                "interim suffix must not be empty",
            ));
        }

        let mapping = &self.columns;
        let named = [
            ("columns.id", &mapping.id),
            ("columns.normalized_address", &mapping.normalized_address),
            ("columns.facility_name", &mapping.facility_name),
            ("columns.postal_code", &mapping.postal_code),
            ("columns.prefecture", &mapping.prefecture),
            ("columns.city", &mapping.city),
            ("columns.street_address", &mapping.street_address),
        ];
        for (field, value) in named {
            if value.trim().is_empty() {
                return Err(ConfigurationError::invalid_value(
                    field,
                    value.as_str(),
                    "column name must not be empty",
                ));
            }
        }
        for (i, (first, header)) in named.iter().enumerate() {
            if let Some((second, _)) = named[i + 1..]
                .iter()
                .find(|(_, other)| other.trim() == header.trim())
            {
                return Err(ConfigurationError::column_conflict(
                    *first,
                    *second,
                    header.trim(),
                ));
            }
        }

        if self.resolver.kind == ResolverKind::Directory && self.resolver.directory_path.is_none()
        {
            return Err(ConfigurationError::missing_required_field(
                "directory_path",
                "resolver (kind: directory)",
            ));
        }

        Ok(())
    }
}
