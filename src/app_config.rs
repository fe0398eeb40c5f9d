use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::segmenter::SegmentationParams;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Directory the subtitle file is written to; defaults to the input's directory
    #[serde(default)]
    pub output_directory: Option<PathBuf>,

    /// Subtitle file name; defaults to the input's stem with an .srt extension
    #[serde(default)]
    pub output_file: Option<String>,

    /// Cue grouping settings
    #[serde(default)]
    pub segmentation: SegmentationParams,

    /// External transcriber settings
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings handed to the external transcriber; none of them affect segmentation
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranscriptionConfig {
    /// Spoken language code (ISO 639-1 or 639-2)
    #[serde(default = "default_language")]
    pub language: String,

    /// Model name (e.g., "tiny", "base", "medium", "large-v3")
    #[serde(default = "default_model")]
    pub model: String,

    /// Optional initial prompt with domain vocabulary
    #[serde(default)]
    pub prompt: Option<String>,

    /// Transcriber executable
    #[serde(default = "default_command")]
    pub command: String,

    /// Transcriber timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            model: default_model(),
            prompt: None,
            command: default_command(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
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

fn default_language() -> String {
    "en".to_string()
}

fn default_model() -> String {
    "medium".to_string()
}

fn default_command() -> String {
    "whisper".to_string()
}

fn default_timeout_secs() -> u64 {
    3600 // long recordings on CPU take a while
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.segmentation.validate()?;

        crate::language_utils::validate_language_code(&self.transcription.language)?;

        if self.transcription.model.trim().is_empty() {
            return Err(anyhow!("Transcription model must not be empty"));
        }

        if self.transcription.command.trim().is_empty() {
            return Err(anyhow!("Transcriber command must not be empty"));
        }

        if self.transcription.timeout_secs == 0 {
            return Err(anyhow!("Transcriber timeout must be greater than zero"));
        }

        if let Some(name) = &self.output_file {
            if name.contains(['/', '\\']) {
                return Err(anyhow!("Output file name must not contain a path separator: {}", name));
            }
        }

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn from_json_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| anyhow!("Failed to open config file {}: {}", path.display(), e))?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path.display(), e))
    }
}
