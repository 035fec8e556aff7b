//! Configuration file support.
//!
//! Settings for staging limits, the upload endpoint and logging, serialized as
//! versioned JSON so a deployment can ship its own file.

use serde::{Deserialize, Serialize};
use url::Url;

use mediastage_net::{DEFAULT_FIELD_NAME, UploadOptions};

use crate::constants::{DEFAULT_MAX_FILE_SIZE, DEFAULT_UPLOAD_ENDPOINT};

/// Log level setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// What to do with images uploaded by a submission that later failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    /// Ask the uploader to delete them (best effort)
    #[default]
    Discard,
    /// Leave them on the server; they are only logged and reported
    Retain,
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Pipeline configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Upload endpoint settings
    #[serde(default)]
    pub upload: UploadConfig,

    /// Staging limits
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Handling of uploads orphaned by a failed submission
    #[serde(default)]
    pub orphan_policy: OrphanPolicy,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Upload endpoint section of the config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Endpoint receiving multipart image batches
    #[serde(default = "default_endpoint")]
    pub endpoint: Url,

    /// Endpoint deleting orphaned uploads, if the server has one
    #[serde(default)]
    pub discard_endpoint: Option<Url>,

    /// Multipart field name for each file
    #[serde(default = "default_field_name")]
    pub field_name: String,
}

fn default_endpoint() -> Url {
    Url::parse(DEFAULT_UPLOAD_ENDPOINT).expect("DEFAULT_UPLOAD_ENDPOINT is a valid URL")
}

fn default_field_name() -> String {
    DEFAULT_FIELD_NAME.to_string()
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            discard_endpoint: None,
            field_name: default_field_name(),
        }
    }
}

impl UploadConfig {
    /// Options for [`mediastage_net::HttpUploader`].
    pub fn to_options(&self) -> UploadOptions {
        let mut options = UploadOptions::new(self.endpoint.clone()).with_field_name(&self.field_name);
        if let Some(discard) = &self.discard_endpoint {
            options = options.with_discard_endpoint(discard.clone());
        }
        options
    }
}

/// Staging limits section of the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Largest accepted file in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
        }
    }
}

impl MediaConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            upload: UploadConfig::default(),
            limits: LimitsConfig::default(),
            orphan_policy: OrphanPolicy::default(),
            log_level: LogLevel::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// File name of the config inside the `mediastage` config directory.
    pub fn default_filename() -> &'static str {
        "mediastage-config.json"
    }

    /// `<config dir>/mediastage/mediastage-config.json`, or `~/.config/...`
    /// when the platform reports no config directory.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        let base = dirs::config_dir().or_else(|| dirs::home_dir().map(|home| home.join(".config")))?;
        Some(base.join("mediastage").join(Self::default_filename()))
    }

    /// Read and validate a config file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let config = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!("⚙️ Media config v{} loaded from {:?}", config.version, path);
        Ok(config)
    }

    /// The config at [`MediaConfig::default_path`], if there is a usable one.
    /// A file that fails to load is logged and ignored.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path().filter(|path| path.is_file())?;
        Self::load(&path)
            .map_err(|e| log::warn!("Ignoring media config {:?}: {}", path, e))
            .ok()
    }

    /// Write the configuration to `path`, creating missing parent directories.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, self.to_json()?)?;
        log::info!("💾 Wrote media config (v{}) to {:?}", self.version, path);
        Ok(())
    }

    /// Write the configuration to [`MediaConfig::default_path`].
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no config or home directory for mediastage",
            ))
        })?;
        self.save(&path)
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
