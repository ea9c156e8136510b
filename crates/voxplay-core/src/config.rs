use crate::error::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub audio: AudioConfig,

    #[serde(default)]
    pub recognizer: RecognizerConfig,

    #[serde(default)]
    pub player: PlayerConfig,

    #[serde(default)]
    pub video: VideoConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AudioConfig {
    #[serde(default = "default_device_name")]
    pub output_device: String,

    #[serde(default = "default_device_name")]
    pub input_device: String,

    /// Frames per capture chunk delivered to the recognizer.
    #[serde(default = "default_capture_buffer_size")]
    pub capture_buffer_size: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            output_device: default_device_name(),
            input_device: default_device_name(),
            capture_buffer_size: default_capture_buffer_size(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecognizerConfig {
    #[serde(default = "default_engine")]
    pub engine: String,

    #[serde(default)]
    pub vosk: Option<VoskConfig>,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            vosk: None,
        }
    }
}

// Serialize: the engine host re-encodes this section as the engine's
// opaque toml::Value config.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VoskConfig {
    pub model_path: String,

    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlayerConfig {
    #[serde(default = "default_seek_step")]
    pub seek_step_seconds: u32,

    /// Poll interval for the video-variant progress reporter.
    #[serde(default = "default_progress_poll_ms")]
    pub progress_poll_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            seek_step_seconds: default_seek_step(),
            progress_poll_ms: default_progress_poll_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct VideoConfig {
    /// Clip length reported by the simulated null backend.
    #[serde(default)]
    pub simulated_duration_seconds: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_device_name() -> String {
    "default".to_string()
}

fn default_capture_buffer_size() -> u32 {
    8000
}

fn default_engine() -> String {
    "null".to_string()
}

fn default_language() -> String {
    "ru".to_string()
}

fn default_seek_step() -> u32 {
    10
}

fn default_progress_poll_ms() -> u64 {
    250
}

/// Interpolate `${VAR}` patterns with environment variable values.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{([^}]+)\}").unwrap();
    let mut result = input.to_string();
    let mut errors = Vec::new();

    for cap in re.captures_iter(input) {
        let var_name = &cap[1];
        match std::env::var(var_name) {
            Ok(val) => {
                result = result.replace(&cap[0], &val);
            }
            Err(_) => {
                errors.push(var_name.to_string());
            }
        }
    }

    if let Some(first_missing) = errors.into_iter().next() {
        return Err(ConfigError::EnvVarNotFound(first_missing));
    }

    Ok(result)
}

impl AppConfig {
    /// Load configuration from a TOML file, with environment variable interpolation.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let interpolated = interpolate_env_vars(&content)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        Ok(config)
    }

    /// Parse configuration from a TOML string (for testing).
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let interpolated = interpolate_env_vars(s)?;
        let config: AppConfig = toml::from_str(&interpolated)?;
        Ok(config)
    }
}
