//! Service configuration.
//!
//! Loaded from TOML. The file is looked up at an explicit path, then at
//! `$PENFLOW_CONFIG`, then at `<config dir>/penflow/config.toml`. A missing
//! default file means built-in defaults. A few environment variables
//! override file values afterwards.

use std::path::{Path, PathBuf};
use std::time::Duration;

use penflow_analyzer::EngineParams;
use penflow_recognizer::{Dimensions, IinkConfig};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PENFLOW_CONFIG";
/// Overrides `recognizer.url`.
pub const RECOGNIZER_URL_ENV: &str = "PENFLOW_RECOGNIZER_URL";
/// Overrides `recognizer.application_key`.
pub const RECOGNIZER_KEY_ENV: &str = "PENFLOW_RECOGNIZER_KEY";
/// Overrides `service.workers`.
pub const WORKERS_ENV: &str = "PENFLOW_WORKERS";

/// Remote ink service connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerSettings {
    /// Batch endpoint.
    pub url: String,
    /// Application key header.
    pub application_key: String,
    /// Signature header.
    pub hmac: String,
    /// User id header.
    pub user_id: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RecognizerSettings {
    fn default() -> Self {
        Self {
            url: penflow_recognizer::client::DEFAULT_URL.to_string(),
            application_key: String::new(),
            hmac: String::new(),
            user_id: String::new(),
            timeout_secs: 30,
        }
    }
}

impl RecognizerSettings {
    /// Client settings for [`IinkClient`](penflow_recognizer::IinkClient).
    pub fn to_iink_config(&self) -> IinkConfig {
        IinkConfig {
            url: self.url.clone(),
            application_key: self.application_key.clone(),
            hmac: self.hmac.clone(),
            user_id: self.user_id.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Page recognition defaults, used when a page omits a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionDefaults {
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Horizontal resolution.
    pub x_dpi: u32,
    /// Vertical resolution.
    pub y_dpi: u32,
    /// Coordinate scale applied before remote calls.
    pub scale: f32,
    /// Recognition language.
    pub language: String,
    /// Recognition content type.
    pub content_type: String,
}

impl Default for RecognitionDefaults {
    fn default() -> Self {
        let dimensions = Dimensions::default();
        Self {
            width: dimensions.width,
            height: dimensions.height,
            x_dpi: dimensions.x_dpi,
            y_dpi: dimensions.y_dpi,
            scale: 1.0,
            language: "en_US".to_string(),
            content_type: "Text".to_string(),
        }
    }
}

/// Analyzer engine defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerDefaults {
    /// Paper width in millimetres.
    pub paper_width: f32,
    /// Paper height in millimetres.
    pub paper_height: f32,
    /// Block sizing sampling steps.
    pub block_size_sampling_steps: i32,
    /// Engine variant.
    pub kind_of_engine: i32,
}

impl Default for AnalyzerDefaults {
    fn default() -> Self {
        let params = EngineParams::default();
        Self {
            paper_width: params.paper_width,
            paper_height: params.paper_height,
            block_size_sampling_steps: params.block_size_sampling_steps,
            kind_of_engine: params.kind_of_engine,
        }
    }
}

impl From<&AnalyzerDefaults> for EngineParams {
    fn from(defaults: &AnalyzerDefaults) -> Self {
        EngineParams {
            paper_width: defaults.paper_width,
            paper_height: defaults.paper_height,
            block_size_sampling_steps: defaults.block_size_sampling_steps,
            kind_of_engine: defaults.kind_of_engine,
        }
    }
}

/// Worker pool and submission settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Number of concurrent workers.
    pub workers: usize,
    /// Pending task queue size.
    pub queue_capacity: usize,
    /// Bounded wait for callers that block on completion, in seconds.
    pub await_timeout_secs: u64,
    /// Accepted submission mime types.
    pub allowed_mime_types: Vec<String>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_capacity: 64,
            await_timeout_secs: 60,
            allowed_mime_types: vec![
                "application/vnd.myscript.jiix".to_string(),
                "application/json".to_string(),
            ],
        }
    }
}

impl ServiceSettings {
    /// Bounded wait as a duration.
    pub fn await_timeout(&self) -> Duration {
        Duration::from_secs(self.await_timeout_secs)
    }

    /// Returns `true` if `mime_type` may be submitted.
    pub fn accepts(&self, mime_type: &str) -> bool {
        self.allowed_mime_types.iter().any(|m| m == mime_type)
    }
}

/// Complete service configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenflowConfig {
    /// Remote ink service.
    pub recognizer: RecognizerSettings,
    /// Page recognition defaults.
    pub defaults: RecognitionDefaults,
    /// Engine defaults.
    pub analyzer: AnalyzerDefaults,
    /// Worker pool.
    pub service: ServiceSettings,
}

impl PenflowConfig {
    /// Default config file location for this platform.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("penflow").join("config.toml"))
    }

    /// Resolves which file [`load`](Self::load) reads.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        explicit
            .map(PathBuf::from)
            .or_else(|| env_value(CONFIG_ENV).map(PathBuf::from))
            .or_else(Self::default_config_path)
    }

    /// Loads configuration and applies environment overrides.
    ///
    /// An explicit or `$PENFLOW_CONFIG` path must exist; the default
    /// location may be absent.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let required = explicit.is_some() || env_value(CONFIG_ENV).is_some();
        let mut config = match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) if required => {
                return Err(Error::config(format!(
                    "Config file does not exist at {}",
                    path.display()
                )));
            }
            _ => {
                tracing::debug!("No config file found, using defaults");
                Self::default()
            }
        };
        config.apply_overrides(env_value)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a config file without applying overrides.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read {}: {e}", path.display())))?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Parses TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(e.to_string()))
    }

    /// Renders the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Applies overrides looked up through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(RECOGNIZER_URL_ENV) {
            self.recognizer.url = url;
        }
        if let Some(key) = lookup(RECOGNIZER_KEY_ENV) {
            self.recognizer.application_key = key;
        }
        if let Some(workers) = lookup(WORKERS_ENV) {
            self.service.workers = workers.trim().parse().map_err(|e| {
                Error::config(format!("{WORKERS_ENV} must be a positive integer: {e}"))
            })?;
        }
        Ok(())
    }

    /// Rejects settings the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.service.workers == 0 {
            return Err(Error::config("service.workers must be at least 1"));
        }
        if self.service.queue_capacity == 0 {
            return Err(Error::config("service.queue_capacity must be at least 1"));
        }
        if self.defaults.scale <= 0.0 {
            return Err(Error::config("defaults.scale must be positive"));
        }
        Ok(())
    }

    /// Default canvas dimensions.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            x_dpi: self.defaults.x_dpi,
            y_dpi: self.defaults.y_dpi,
            width: self.defaults.width,
            height: self.defaults.height,
        }
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
