use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Result, Context, anyhow};
use async_trait::async_trait;
use log::{error, info, debug};
use tokio::process::Command;

use crate::app_config::TranscriptionConfig;
use crate::errors::TranscriberError;
use crate::language_utils;
use crate::transcript::Transcript;

// @module: Boundary to the external speech-to-text collaborator

/// Source of word-level transcripts
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Produce a word-timestamped transcript for the given input file
    async fn transcribe(&self, input: &Path) -> Result<Transcript>;

    /// Name used in log messages
    fn name(&self) -> &str;
}

/// Loads transcripts that were already produced and saved as JSON
#[derive(Debug, Default, Clone)]
pub struct JsonTranscriptSource;

#[async_trait]
impl Transcriber for JsonTranscriptSource {
    async fn transcribe(&self, input: &Path) -> Result<Transcript> {
        let content = tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("Failed to read transcript file: {}", input.display()))?;
        Transcript::from_json_str(&content)
            .with_context(|| format!("Invalid transcript file: {}", input.display()))
    }

    fn name(&self) -> &str {
        "json"
    }
}

/// Runs the `whisper` command line tool with word timestamps enabled
#[derive(Debug, Clone)]
pub struct WhisperCliTranscriber {
    config: TranscriptionConfig,
}

impl WhisperCliTranscriber {
    pub fn new(config: TranscriptionConfig) -> Self {
        Self { config }
    }

    /// Arguments passed to the transcriber for one input
    pub fn build_args(&self, input: &Path, output_dir: &Path) -> Vec<String> {
        let language = language_utils::normalize_to_part1_or_part2t(&self.config.language)
            .unwrap_or_else(|_| self.config.language.clone());

        let mut args = vec![
            input.to_string_lossy().to_string(),
            "--model".to_string(),
            self.config.model.clone(),
            "--language".to_string(),
            language,
            "--word_timestamps".to_string(),
            "True".to_string(),
            "--output_format".to_string(),
            "json".to_string(),
            "--output_dir".to_string(),
            output_dir.to_string_lossy().to_string(),
        ];

        if let Some(prompt) = self.config.prompt.as_deref().filter(|p| !p.trim().is_empty()) {
            args.push("--initial_prompt".to_string());
            args.push(prompt.to_string());
        }

        args
    }

    /// Path of the JSON file the transcriber writes for `input`
    pub fn expected_output(input: &Path, output_dir: &Path) -> PathBuf {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        output_dir.join(format!("{}.json", stem))
    }

    /// Keep only the stderr lines that say something about the failure
    fn filter_stderr(stderr: &str) -> String {
        let noisy_prefixes = ["Detecting language", "100%|", "  0%|", "Warning: "];

        let meaningful: Vec<&str> = stderr
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| !noisy_prefixes.iter().any(|p| line.starts_with(p)))
            .filter(|line| !line.contains("it/s]") && !line.contains("frames/s]"))
            .collect();

        if meaningful.is_empty() {
            "unknown transcriber error (stderr was empty after filtering)".to_string()
        } else {
            meaningful.join("\n")
        }
    }
}

#[async_trait]
impl Transcriber for WhisperCliTranscriber {
    async fn transcribe(&self, input: &Path) -> Result<Transcript> {
        if !input.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", input));
        }

        let output_dir = tempfile::tempdir().context("Failed to create transcriber output directory")?;
        let args = self.build_args(input, output_dir.path());
        debug!("Running {} {}", self.config.command, args.join(" "));
        info!("Transcribing {:?} with model '{}'", input, self.config.model);

        let run = Command::new(&self.config.command)
            .args(&args)
            .kill_on_drop(true)
            .output();

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let output = tokio::select! {
            result = run => {
                result.map_err(|e| TranscriberError::LaunchFailed {
                    command: self.config.command.clone(),
                    message: e.to_string(),
                })?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(TranscriberError::Timeout(self.config.timeout_secs).into());
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let filtered = Self::filter_stderr(&stderr);
            error!("Transcription failed: {}", filtered);
            return Err(TranscriberError::ProcessFailed(filtered).into());
        }

        let json_path = Self::expected_output(input, output_dir.path());
        if !json_path.exists() {
            return Err(TranscriberError::OutputMissing(json_path.display().to_string()).into());
        }

        Transcript::from_json_file(&json_path)
    }

    fn name(&self) -> &str {
        &self.config.command
    }
}
