//! TOML-based configuration for sudo-touchid.
//!
//! The config file is optional.  When it is absent every setting takes its
//! default, which targets `/etc/pam.d/sudo_local` with the atomic write
//! strategy.  Example:
//!
//! ```toml
//! [pam]
//! path = "/etc/pam.d/sudo_local"
//! file_mode = 0o600
//! write_strategy = "atomic"   # or "in-place"
//!
//! [logging]
//! level = "warn"
//! ```
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the field is absent, so a partial file only overrides
//! what it names.  CLI flags and environment variables take precedence over
//! anything loaded here (see [`PamConfig::with_overrides`]).

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::infrastructure::storage::file_accessor::DEFAULT_CREATE_MODE;
use crate::infrastructure::storage::pam_file::WriteStrategy;

/// Where the config file is looked up when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/sudo-touchid/config.toml";

/// The PAM include file that `/etc/pam.d/sudo` reads and that survives
/// system updates.
pub const DEFAULT_PAM_PATH: &str = "/etc/pam.d/sudo_local";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error other than "not found" occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// `pam.file_mode` has bits outside `0o777`.
    #[error("invalid pam.file_mode {0:#o}: only permission bits 0o000..=0o777 are allowed")]
    InvalidFileMode(u32),

    /// `logging.level` is not a recognised level.
    #[error("invalid logging.level {0:?}: expected off, error, warn, info, debug or trace")]
    InvalidLogLevel(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub pam: PamConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which file to edit and how.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PamConfig {
    /// Path of the PAM service file holding the Touch ID directive.
    #[serde(default = "default_pam_path")]
    pub path: PathBuf,
    /// Permission bits for a newly created service file.
    #[serde(default = "default_file_mode")]
    pub file_mode: u32,
    /// How an existing service file is rewritten.
    #[serde(default)]
    pub write_strategy: WriteStrategy,
}

/// Log output settings.  `RUST_LOG` overrides `level` when set.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_pam_path() -> PathBuf {
    PathBuf::from(DEFAULT_PAM_PATH)
}
fn default_file_mode() -> u32 {
    DEFAULT_CREATE_MODE
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for PamConfig {
    fn default() -> Self {
        Self {
            path: default_pam_path(),
            file_mode: default_file_mode(),
            write_strategy: WriteStrategy::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl PamConfig {
    /// Applies command-line (or environment) overrides on top of the loaded
    /// settings.
    pub fn with_overrides(mut self, path: Option<PathBuf>, strategy: Option<WriteStrategy>) -> Self {
        if let Some(path) = path {
            self.path = path;
        }
        if let Some(strategy) = strategy {
            self.write_strategy = strategy;
        }
        self
    }
}

impl LoggingConfig {
    /// Parsed form of `level`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLogLevel`] for an unknown level name.
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.level)
            .map_err(|_| ConfigError::InvalidLogLevel(self.level.clone()))
    }
}

impl AppConfig {
    /// Checks values that deserialise fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidFileMode`] or
    /// [`ConfigError::InvalidLogLevel`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pam.file_mode & !0o777 != 0 {
            return Err(ConfigError::InvalidFileMode(self.pam.file_mode));
        }
        self.logging.level_filter()?;
        Ok(())
    }
}

// ── Config loading ────────────────────────────────────────────────────────────

/// Loads and validates `AppConfig` from `path`, returning
/// `AppConfig::default()` if the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// [`ConfigError::Parse`] if the TOML is malformed, and the validation errors
/// from [`AppConfig::validate`].
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str::<AppConfig>(&content)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
        Err(e) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    config.validate()?;
    Ok(config)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
