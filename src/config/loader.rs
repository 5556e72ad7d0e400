//! Configuration Loader
//!
//! Environment-aware configuration loading. Handles YAML file discovery,
//! environment detection and deep-merging of environment override sections.

use super::error::{ConfigResult, ConfigurationError};
use super::EnricherConfig;
use serde_yaml::Value as YamlValue;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

const CONFIG_FILE_NAMES: [&str; 2] = ["facility-config.yaml", "facility-config.yml"];
const ENVIRONMENT_SECTIONS: [&str; 3] = ["development", "test", "production"];

/// Loaded configuration plus the context it was resolved from
#[derive(Debug)]
pub struct ConfigManager {
    config: EnricherConfig,
    environment: String,
    config_directory: PathBuf,
    /// `None` when running on built-in defaults
    config_file: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment.
    /// A missing configuration file is an error.
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let config_directory = config_dir.unwrap_or_else(Self::default_config_directory);

        debug!(
            "Loading configuration for environment '{}' from directory: {}",
            environment,
            config_directory.display()
        );

        let config_file = Self::find_config_file(&config_directory)?;
        let config = Self::load_and_merge_config(&config_file, environment)?;
        config.validate()?;

        info!(
            environment = environment,
            config_file = %config_file.display(),
            batch_size = config.pipeline.batch_size,
            resolver = ?config.resolver.kind,
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
            config_file: Some(config_file),
        }))
    }

    /// Like `load_from_directory_with_env`, but falls back to built-in defaults
    /// when no configuration file exists. Malformed files are still errors.
    pub fn load_or_default(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        match Self::load_from_directory_with_env(config_dir.clone(), environment) {
            Err(ConfigurationError::ConfigFileNotFound { searched_paths }) => {
                debug!(
                    ?searched_paths,
                    "No configuration file found, using built-in defaults"
                );
                Ok(Arc::new(Self::from_config(
                    EnricherConfig::default(),
                    environment,
                    config_dir.unwrap_or_else(Self::default_config_directory),
                )))
            }
            other => other,
        }
    }

    /// Wrap an already-built configuration, e.g. one assembled from CLI flags
    pub fn from_config(
        config: EnricherConfig,
        environment: &str,
        config_directory: PathBuf,
    ) -> ConfigManager {
        ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
            config_file: None,
        }
    }

    pub fn config(&self) -> &EnricherConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Detect current environment from environment variables
    pub fn detect_environment() -> String {
        env::var("FACILITY_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
    }

    fn default_config_directory() -> PathBuf {
        PathBuf::from("config")
    }

    fn find_config_file(config_directory: &Path) -> ConfigResult<PathBuf> {
        let mut searched_paths = Vec::new();

        for name in CONFIG_FILE_NAMES {
            let config_path = config_directory.join(name);
            searched_paths.push(config_path.clone());

            if config_path.is_file() {
                debug!("Found configuration file: {}", config_path.display());
                return Ok(config_path);
            }
        }

        Err(ConfigurationError::config_file_not_found(searched_paths))
    }

    /// Read a configuration file with a size limit
    fn read_config_file_safely(path: &Path) -> ConfigResult<String> {
        const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

        let metadata = std::fs::metadata(path)
            .map_err(|e| ConfigurationError::file_read_error(path.display().to_string(), e))?;

        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigurationError::invalid_value(
                "file_size",
                metadata.len().to_string(),
                format!("Configuration file larger than {MAX_CONFIG_FILE_SIZE} bytes"),
            ));
        }

        std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::file_read_error(path.display().to_string(), e))
    }

    /// Load and merge configuration with environment-specific overrides
    fn load_and_merge_config(config_file: &Path, environment: &str) -> ConfigResult<EnricherConfig> {
        let yaml_content = Self::read_config_file_safely(config_file)?;

        let mut yaml_data: YamlValue = serde_yaml::from_str(&yaml_content)
            .map_err(|e| ConfigurationError::invalid_yaml(config_file.display().to_string(), e))?;

        // An empty file parses to Null; treat it as "all defaults"
        if yaml_data.is_null() {
            yaml_data = YamlValue::Mapping(Default::default());
        }

        if let Some(env_overrides) = yaml_data
            .get(YamlValue::String(environment.to_string()))
            .cloned()
        {
            debug!("Applying environment-specific overrides for: {}", environment);
            Self::merge_yaml_values(&mut yaml_data, env_overrides);
        }

        if let YamlValue::Mapping(ref mut map) = yaml_data {
            for section in ENVIRONMENT_SECTIONS {
                map.remove(YamlValue::String(section.to_string()));
            }
        }

        serde_yaml::from_value(yaml_data).map_err(|e| {
            ConfigurationError::invalid_yaml(
                config_file.display().to_string(),
                format!("Failed to deserialize configuration: {e}"),
            )
        })
    }

    /// Recursively merge YAML values (environment overrides into base config)
    fn merge_yaml_values(base: &mut YamlValue, override_value: YamlValue) {
        match (&mut *base, override_value) {
            (YamlValue::Mapping(base_map), YamlValue::Mapping(override_map)) => {
                for (key, value) in override_map {
                    if let Some(existing_value) = base_map.get_mut(&key) {
                        Self::merge_yaml_values(existing_value, value);
                    } else {
                        base_map.insert(key, value);
                    }
                }
            }
            (base_ref, override_val) => {
                *base_ref = override_val;
            }
        }
    }
}
