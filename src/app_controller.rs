use anyhow::{Result, Context, anyhow};
use log::{error, warn, info, debug};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::file_utils::{FileManager, FileType};
use crate::segmenter::CueSegmenter;
use crate::subtitle_processor::SubtitleCollection;
use crate::transcriber::{JsonTranscriptSource, Transcriber, WhisperCliTranscriber};
use crate::transcript::Transcript;

// @module: Application controller for transcript-to-subtitle conversion

/// Outcome of processing one input file
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Subtitles were written to the given path
    Written { path: PathBuf, cue_count: usize },
    /// Output already existed and overwriting was not requested
    Skipped(PathBuf),
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Segmenter built from the validated configuration
    segmenter: CueSegmenter,
    // @field: Collaborator used for media inputs
    transcriber: Arc<dyn Transcriber>,
}

impl Controller {
    // @method: Create a new controller that transcribes media with the configured command
    pub fn with_config(config: Config) -> Result<Self> {
        let transcriber = Arc::new(WhisperCliTranscriber::new(config.transcription.clone()));
        Self::with_transcriber(config, transcriber)
    }

    /// Create a controller with a custom transcriber for media inputs
    pub fn with_transcriber(config: Config, transcriber: Arc<dyn Transcriber>) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        let segmenter = CueSegmenter::new(config.segmentation.clone())?;

        Ok(Self {
            config,
            segmenter,
            transcriber,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Where the subtitle file for `input_file` goes
    pub fn output_path_for(&self, input_file: &Path) -> PathBuf {
        let output_dir = self
            .config
            .output_directory
            .clone()
            .unwrap_or_else(|| input_file.parent().unwrap_or(Path::new(".")).to_path_buf());

        FileManager::generate_output_path(input_file, output_dir, self.config.output_file.as_deref())
    }

    /// Output paths that more than one of `input_files` would write to,
    /// with the inputs that share each one
    pub fn output_collisions(&self, input_files: &[PathBuf]) -> Vec<(PathBuf, Vec<PathBuf>)> {
        let mut by_output: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
        for input in input_files {
            by_output.entry(self.output_path_for(input)).or_default().push(input.clone());
        }
        by_output.into_iter().filter(|(_, inputs)| inputs.len() > 1).collect()
    }

    /// Load the word-level transcript for one input file
    pub async fn load_transcript(&self, input_file: &Path) -> Result<Transcript> {
        match FileManager::detect_file_type(input_file)? {
            FileType::Transcript => {
                debug!("Detected transcript file, skipping transcription");
                JsonTranscriptSource.transcribe(input_file).await
            }
            FileType::Media => {
                debug!("Transcribing media with {}", self.transcriber.name());
                self.transcriber.transcribe(input_file).await
            }
            FileType::Subtitle => Err(anyhow!(
                "Input is already a subtitle file and has no word timestamps: {:?}",
                input_file
            )),
            FileType::Unknown => Err(anyhow!("Unsupported input file type: {:?}", input_file)),
        }
    }

    /// Convert a transcript into a subtitle collection
    pub fn build_subtitles(&self, input_file: &Path, transcript: &Transcript) -> SubtitleCollection {
        let entries = self.segmenter.segment_transcript(transcript);
        let language = transcript
            .language
            .clone()
            .unwrap_or_else(|| self.config.transcription.language.clone());

        SubtitleCollection::from_entries(input_file.to_path_buf(), language, entries)
    }

    /// Run the main workflow for one input file
    pub async fn run(&self, input_file: PathBuf, force_overwrite: bool) -> Result<RunOutcome> {
        let start_time = std::time::Instant::now();

        if !input_file.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output_path = self.output_path_for(&input_file);
        if output_path.exists() && !force_overwrite {
            warn!("Skipping {:?}, subtitles already exist (use -f to force overwrite)", input_file);
            return Ok(RunOutcome::Skipped(output_path));
        }

        let transcript = self.load_transcript(&input_file).await?;
        if transcript.word_count() == 0 {
            warn!("Transcript for {:?} contains no words", input_file);
        }

        let subtitles = self.build_subtitles(&input_file, &transcript);

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                FileManager::ensure_dir(parent)?;
            }
        }
        subtitles.write_to_srt(&output_path)?;

        info!(
            "Subtitles saved to: {:?} ({} cues, {:.1?})",
            output_path,
            subtitles.entries.len(),
            start_time.elapsed()
        );

        Ok(RunOutcome::Written {
            path: output_path,
            cue_count: subtitles.entries.len(),
        })
    }

    /// Process every transcript and media file under a directory
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<Vec<RunOutcome>> {
        if !input_dir.is_dir() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        if self.config.output_file.is_some() {
            warn!("Ignoring configured output file name in folder mode");
        }

        let files = FileManager::find_files(&input_dir, &[FileType::Transcript, FileType::Media])?;
        if files.is_empty() {
            return Err(anyhow!("No transcript or media files found in directory: {:?}", input_dir));
        }

        // Per-file names are derived from each input in folder mode
        let folder_controller = Controller {
            config: Config {
                output_file: None,
                ..self.config.clone()
            },
            segmenter: self.segmenter.clone(),
            transcriber: Arc::clone(&self.transcriber),
        };

        for (output, inputs) in folder_controller.output_collisions(&files) {
            warn!(
                "{} inputs map to the same output {:?}, only the first is written unless -f is given: {:?}",
                inputs.len(),
                output,
                inputs
            );
        }

        let progress = ProgressBar::new(files.len() as u64);
        match ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            Ok(style) => progress.set_style(style.progress_chars("#>-")),
            Err(e) => warn!("Progress bar template error: {}", e),
        }

        let mut outcomes = Vec::with_capacity(files.len());
        let mut failures = 0usize;
        for file in files {
            progress.set_message(
                file.file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
            );

            match folder_controller.run(file.clone(), force_overwrite).await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    failures += 1;
                    error!("Error processing {:?}: {:#}", file, e);
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        info!(
            "Finished processing {} files ({} failed)",
            outcomes.len() + failures,
            failures
        );

        Ok(outcomes)
    }
}
