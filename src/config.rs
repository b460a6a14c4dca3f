//! Configuration management for blueprint
//!
//! Settings are loaded from environment variables with sensible defaults, and can be
//! overlaid by an optional `blueprint.toml` at the repository root.
//!
//! # Environment Variables
//!
//! - `BLUEPRINT_LOG_LEVEL`: Logging level - default: "info"
//! - `BLUEPRINT_PROBE_URL`: Page fetched by `blueprint probe` - default: "http://www.dotnetfoundation.org/"
//! - `BLUEPRINT_PROBE_NEEDLE`: String counted in the probed page - default: ".NET"
//! - `BLUEPRINT_REQUEST_TIMEOUT`: Probe timeout in seconds - default: "30"
//! - `BLUEPRINT_GITVERSION`: GitVersion executable - default: "gitversion"
//!
//! CI detection and build switches (`APPVEYOR_*`, `CLIENT_SKIP_*`, `GITHUB_*`) are read
//! through [`crate::ci::BuildContext`], not here.
//!
//! # Example
//!
//! ```no_run
//! use blueprint::BlueprintConfig;
//! use std::path::Path;
//!
//! let config = BlueprintConfig::load(Path::new(".")).expect("Invalid configuration");
//! println!("{}", config);
//! ```

use crate::build::gitversion::DEFAULT_GITVERSION;
use crate::build::paths::ProjectLayout;
use crate::probe::{DEFAULT_NEEDLE, DEFAULT_PROBE_URL};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// File name of the optional configuration file
pub const CONFIG_FILE: &str = "blueprint.toml";

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Failed to read the configuration file
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML
    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlueprintConfig {
    /// Page fetched by the probe
    pub probe_url: String,

    /// String counted in the probed page
    pub probe_needle: String,

    /// Probe request timeout in seconds
    pub request_timeout_secs: u64,

    /// GitVersion executable
    pub gitversion: PathBuf,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Project names used to derive paths and packages
    pub layout: ProjectLayout,
}

/// Shape of `blueprint.toml`; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    probe_url: Option<String>,
    probe_needle: Option<String>,
    request_timeout_secs: Option<u64>,
    gitversion: Option<PathBuf>,
    log_level: Option<String>,
    layout: Option<ProjectLayout>,
}

impl Default for BlueprintConfig {
    /// Loads from `BLUEPRINT_*` environment variables, falling back to defaults
    fn default() -> Self {
        let probe_url = env::var("BLUEPRINT_PROBE_URL").unwrap_or_else(|_| DEFAULT_PROBE_URL.to_string());

        let probe_needle =
            env::var("BLUEPRINT_PROBE_NEEDLE").unwrap_or_else(|_| DEFAULT_NEEDLE.to_string());

        let request_timeout_secs = env::var("BLUEPRINT_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let gitversion = env::var("BLUEPRINT_GITVERSION")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_GITVERSION));

        let log_level = env::var("BLUEPRINT_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            probe_url,
            probe_needle,
            request_timeout_secs,
            gitversion,
            log_level,
            layout: ProjectLayout::default(),
        }
    }
}

impl BlueprintConfig {
    /// Environment defaults overlaid with `<root>/blueprint.toml` when present, then validated
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = root.join(CONFIG_FILE);
        if path.is_file() {
            let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
            config.merge_toml(&content).map_err(|source| ConfigError::ParseError {
                path: path.display().to_string(),
                source,
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Applies the keys present in a `blueprint.toml` document
    pub fn merge_toml(&mut self, content: &str) -> Result<(), toml::de::Error> {
        let file: FileConfig = toml::from_str(content)?;

        if let Some(v) = file.probe_url {
            self.probe_url = v;
        }
        if let Some(v) = file.probe_needle {
            self.probe_needle = v;
        }
        if let Some(v) = file.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        if let Some(v) = file.gitversion {
            self.gitversion = v;
        }
        if let Some(v) = file.log_level {
            self.log_level = v.to_lowercase();
        }
        if let Some(v) = file.layout {
            self.layout = v;
        }
        Ok(())
    }

    /// Validates the configuration
    ///
    /// Checks that:
    /// - The timeout is between 1 second and 10 minutes
    /// - The probe URL is http(s) and the needle is non-empty
    /// - The log level is valid
    /// - Project names are non-empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }
        if self.request_timeout_secs > 600 {
            return Err(ConfigError::ValidationFailed(
                "Request timeout cannot exceed 10 minutes".to_string(),
            ));
        }

        if !(self.probe_url.starts_with("http://") || self.probe_url.starts_with("https://")) {
            return Err(ConfigError::ValidationFailed(format!(
                "Probe URL must use http or https: {}",
                self.probe_url
            )));
        }
        if self.probe_needle.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Probe needle cannot be empty".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        if self.layout.client_project.is_empty() || self.layout.test_project.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Project names cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Converts configuration to a display map for output formatting
    pub fn to_display_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert("probe_url".to_string(), self.probe_url.clone());
        map.insert("probe_needle".to_string(), self.probe_needle.clone());
        map.insert(
            "request_timeout_secs".to_string(),
            self.request_timeout_secs.to_string(),
        );
        map.insert(
            "gitversion".to_string(),
            self.gitversion.display().to_string(),
        );
        map.insert("log_level".to_string(), self.log_level.clone());
        map.insert(
            "client_project".to_string(),
            self.layout.client_project.clone(),
        );
        map.insert("test_project".to_string(), self.layout.test_project.clone());

        map
    }
}

impl fmt::Display for BlueprintConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Blueprint Configuration:")?;
        writeln!(f, "  Probe URL: {}", self.probe_url)?;
        writeln!(f, "  Probe Needle: {}", self.probe_needle)?;
        writeln!(f, "  Request Timeout: {}s", self.request_timeout_secs)?;
        writeln!(f, "  GitVersion: {}", self.gitversion.display())?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Client Project: {}", self.layout.client_project)?;
        writeln!(f, "  Test Project: {}", self.layout.test_project)?;
        Ok(())
    }
}
