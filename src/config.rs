//! Configuration management for filekit
//!
//! Defaults for JSON output, permission bits, temp resources and size
//! formatting. Every value can come from an optional `filekit.toml` (or any
//! format the `config` crate understands) and from `FILEKIT`-prefixed
//! environment variables, e.g. `FILEKIT_TEMP__PREFIX`.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::FsError;
use crate::inspect::size::{MAX_PRECISION, format_path_size, format_size};
use crate::utils::validation::is_valid_prefix;

/// Complete library configuration
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct FilekitConfig {
    pub json: JsonConfig,
    pub permissions: PermissionsConfig,
    pub temp: TempConfig,
    pub format: FormatConfig,
}

/// JSON file output
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct JsonConfig {
    /// Pretty-print with literal slashes and non-ASCII characters
    pub human: bool,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self { human: true }
    }
}

/// Permission bits applied to written files and created directories
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PermissionsConfig {
    pub file_mode: u32,
    pub dir_mode: u32,
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            file_mode: 0o644,
            dir_mode: 0o755,
        }
    }
}

/// Temp resource creation
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TempConfig {
    /// Directory temp resources are created in; the system temp dir if unset
    pub base_dir: Option<PathBuf>,
    pub prefix: String,
    /// Name collisions tolerated before giving up on a temp directory
    pub max_attempts: usize,
    pub dir_mode: u32,
}

impl Default for TempConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            prefix: "filekit-".to_string(),
            max_attempts: 100,
            dir_mode: 0o700,
        }
    }
}

impl TempConfig {
    /// Get the base directory as a PathBuf
    pub fn base_dir_path(&self) -> PathBuf {
        self.base_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Human-readable size formatting
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FormatConfig {
    pub precision: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self { precision: 2 }
    }
}

impl FormatConfig {
    /// Format a byte count with the configured precision
    pub fn size(&self, bytes: u64) -> String {
        format_size(bytes, self.precision)
    }

    /// Format the size of the file at `path` with the configured precision
    pub fn path_size(&self, path: &Path) -> Result<String, FsError> {
        format_path_size(path, self.precision)
    }
}

impl FilekitConfig {
    /// Load configuration from an optional `filekit` file in the working
    /// directory with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::build(File::with_name("filekit").required(false))
    }

    /// Load configuration from the given file with environment overrides
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        Self::build(File::from(path).required(true))
    }

    fn build<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("FILEKIT").separator("__"))
            .build()?;
        let config: FilekitConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        for (name, mode) in [
            ("permissions.file_mode", self.permissions.file_mode),
            ("permissions.dir_mode", self.permissions.dir_mode),
            ("temp.dir_mode", self.temp.dir_mode),
        ] {
            if mode > 0o7777 {
                return Err(config::ConfigError::Message(format!(
                    "{name} must be at most 0o7777, got {mode:o}"
                )));
            }
        }

        if !is_valid_prefix(&self.temp.prefix) {
            return Err(config::ConfigError::Message(
                "temp.prefix must be non-empty and contain no path separator".into(),
            ));
        }

        if self.temp.max_attempts == 0 {
            return Err(config::ConfigError::Message(
                "temp.max_attempts must be greater than 0".into(),
            ));
        }

        if self.format.precision > MAX_PRECISION {
            return Err(config::ConfigError::Message(format!(
                "format.precision must be at most {MAX_PRECISION}"
            )));
        }

        Ok(())
    }
}
