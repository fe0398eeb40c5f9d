// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use subcue::app_config::{Config, LogLevel};
use subcue::app_controller::{Controller, RunOutcome};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Turn a transcript or media file into SRT subtitles (default command)
    Segment(SegmentCommand),

    /// Generate shell completions for subcue
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct SegmentArgs {
    /// Output directory (defaults to the input file's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output file name, e.g. output.srt (single file mode only)
    #[arg(short = 'n', long)]
    output_file: Option<String>,

    /// Maximum words per cue
    #[arg(short = 'w', long)]
    max_words: Option<usize>,

    /// Silence in seconds that starts a new cue
    #[arg(short, long)]
    pause_threshold: Option<f64>,

    /// Drop cues whose text is empty after whitespace normalization
    #[arg(long)]
    drop_empty_cues: bool,

    /// Spoken language code passed to the transcriber (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    language: Option<String>,

    /// Transcriber model name
    #[arg(short, long)]
    model: Option<String>,

    /// Initial prompt with domain vocabulary for the transcriber
    #[arg(long)]
    prompt: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "subcue.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,
}

#[derive(Args, Debug, Clone)]
struct SegmentCommand {
    /// Transcript JSON, media file, or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    #[command(flatten)]
    options: SegmentArgs,
}

/// subcue - word timestamps to SubRip cues
///
/// Groups word-level speech-to-text timestamps into readable subtitle cues.
#[derive(Parser, Debug)]
#[command(name = "subcue")]
#[command(version)]
#[command(about = "Turn word-level transcripts into SRT subtitles")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "subcue groups word-level timestamps into SRT cues, splitting on word count, pauses and sentence ends.

EXAMPLES:
    subcue talk.json                          # Segment an existing whisper JSON transcript
    subcue talk.mp4                           # Transcribe with the whisper CLI, then segment
    subcue -w 5 -p 0.6 talk.json              # Up to 5 words per cue, split on 0.6s pauses
    subcue -o subs -n talk.en.srt talk.mp3    # Choose output directory and file name
    subcue -l de -m large-v3 interview.wav    # Pass language and model to the transcriber
    subcue --log-level debug /recordings/     # Process an entire directory
    subcue completions bash > subcue.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in subcue.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. Command line flags override the file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Transcript JSON, media file, or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    #[command(flatten)]
    options: SegmentArgs,
}

// @struct: Custom logger implementation, filtered by the global max level
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subcue", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Segment(command)) => run_segment(command.input_path, command.options).await,
        None => {
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;
            run_segment(input_path, cli.options).await
        }
    }
}

/// Load the config file (or create it with defaults) and apply CLI overrides
fn load_config(options: &SegmentArgs) -> Result<Config> {
    let config_path = Path::new(&options.config_path);

    let mut config = if config_path.exists() {
        Config::from_json_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", options.config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", options.config_path))?;

        config
    };

    if let Some(dir) = &options.output_dir {
        config.output_directory = Some(dir.clone());
    }
    if let Some(name) = &options.output_file {
        config.output_file = Some(name.clone());
    }
    if let Some(max_words) = options.max_words {
        config.segmentation.max_words_per_cue = max_words;
    }
    if let Some(threshold) = options.pause_threshold {
        config.segmentation.pause_threshold = threshold;
    }
    if options.drop_empty_cues {
        config.segmentation.keep_empty_cues = false;
    }
    if let Some(language) = &options.language {
        config.transcription.language = language.clone();
    }
    if let Some(model) = &options.model {
        config.transcription.model = model.clone();
    }
    if let Some(prompt) = &options.prompt {
        config.transcription.prompt = Some(prompt.clone());
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(config)
}

async fn run_segment(input_path: PathBuf, options: SegmentArgs) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&options)?;
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    if input_path.is_file() {
        if let RunOutcome::Skipped(path) = controller.run(input_path, options.force_overwrite).await? {
            info!("Left existing file untouched: {}", path.display());
        }
    } else if input_path.is_dir() {
        controller.run_folder(input_path, options.force_overwrite).await?;
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    Ok(())
}
