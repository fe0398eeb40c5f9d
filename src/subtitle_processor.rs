use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context, anyhow};
use log::{warn, debug};

// @module: SRT cue model, timestamp formatting and SRT reading/writing

// @const: SRT timestamp line regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2,}:\d{2}:\d{2}[,.]\d{3})\s*-->\s*(\d{2,}:\d{2}:\d{2}[,.]\d{3})").unwrap()
});

// @struct: Single subtitle cue
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEntry {
    // @field: Sequence number, starting at 1
    pub seq_num: usize,

    // @field: Start time in seconds
    pub start_secs: f64,

    // @field: End time in seconds
    pub end_secs: f64,

    // @field: Cue text
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry without any checks
    pub fn new(seq_num: usize, start_secs: f64, end_secs: f64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_secs,
            end_secs,
            text,
        }
    }

    // @creates: Validated subtitle entry
    // @validates: Time range and non-empty text
    pub fn new_validated(seq_num: usize, start_secs: f64, end_secs: f64, text: String) -> Result<Self> {
        if end_secs < start_secs {
            return Err(anyhow!(
                "Invalid time range: end time {} < start time {}",
                end_secs, start_secs
            ));
        }

        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return Err(anyhow!("Empty subtitle text for entry {}", seq_num));
        }

        Ok(SubtitleEntry {
            seq_num,
            start_secs,
            end_secs,
            text: trimmed_text.to_string(),
        })
    }

    /// Cue duration in seconds; negative for out-of-order input
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }

    /// Parse an SRT timestamp (HH:MM:SS,mmm) to seconds
    pub fn parse_timestamp(timestamp: &str) -> Result<f64> {
        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        let total_ms = hours
            .checked_mul(3_600_000)
            .and_then(|ms| ms.checked_add(minutes * 60_000 + seconds * 1_000 + millis))
            .ok_or_else(|| anyhow!("Timestamp out of range: {}", timestamp))?;
        Ok(total_ms as f64 / 1_000.0)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_secs)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_secs)
    }

    /// Format a time in seconds as an SRT timestamp (HH:MM:SS,mmm).
    ///
    /// The value is rounded to whole microseconds and then truncated to
    /// milliseconds. Hours are not wrapped at 24, so long inputs keep
    /// counting upwards. Negative and non-finite values format as zero.
    pub fn format_timestamp(seconds: f64) -> String {
        let micros = if seconds.is_finite() && seconds > 0.0 {
            (seconds * 1_000_000.0).round() as u64
        } else {
            0
        };
        let ms = micros / 1_000;

        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let secs = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Collection of subtitle cues with metadata
#[derive(Debug)]
pub struct SubtitleCollection {
    /// File the cues were produced from (transcript or media)
    pub source_file: PathBuf,

    /// List of subtitle cues
    pub entries: Vec<SubtitleEntry>,

    /// Spoken language tag, when known
    pub language: String,
}

impl SubtitleCollection {
    /// Create a new, empty subtitle collection
    pub fn new(source_file: PathBuf, language: String) -> Self {
        SubtitleCollection {
            source_file,
            entries: Vec::new(),
            language,
        }
    }

    /// Create a collection from already segmented cues
    pub fn from_entries(source_file: PathBuf, language: String, entries: Vec<SubtitleEntry>) -> Self {
        SubtitleCollection {
            source_file,
            entries,
            language,
        }
    }

    /// Render all cues in SRT layout
    pub fn to_srt_string(&self) -> String {
        self.entries.iter().map(|entry| entry.to_string()).collect()
    }

    /// Write subtitles to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;

        for entry in &self.entries {
            write!(file, "{}", entry)
                .with_context(|| format!("Failed to write cue {} to {}", entry.seq_num, path.display()))?;
        }

        debug!("Wrote {} cues to {}", self.entries.len(), path.display());
        Ok(())
    }

    /// Parse SRT format string into subtitle entries
    ///
    /// Entries are sorted by start time and renumbered from 1. Entries with
    /// empty text or an end before their start are skipped with a warning.
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>> {
        let mut entries = Vec::new();

        let mut current_seq_num: Option<usize> = None;
        let mut current_times: Option<(f64, f64)> = None;
        let mut current_text = String::new();

        let mut add_current_entry = |seq_num: usize, start: f64, end: f64, text: &str| {
            match SubtitleEntry::new_validated(seq_num, start, end, text.to_string()) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping invalid subtitle entry {}: {}", seq_num, e),
            }
        };

        for (line_idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                if let (Some(seq_num), Some((start, end))) = (current_seq_num, current_times) {
                    add_current_entry(seq_num, start, end, &current_text);
                    current_seq_num = None;
                    current_times = None;
                    current_text.clear();
                }
                continue;
            }

            if current_seq_num.is_none() {
                match trimmed.trim_start_matches('\u{feff}').parse::<usize>() {
                    Ok(num) => current_seq_num = Some(num),
                    Err(_) => warn!("Unexpected text at line {} before sequence number: {}", line_idx + 1, trimmed),
                }
                continue;
            }

            if current_times.is_none() {
                let parsed = TIMESTAMP_REGEX.captures(trimmed).map(|caps| {
                    SubtitleEntry::parse_timestamp(&caps[1])
                        .and_then(|start| Ok((start, SubtitleEntry::parse_timestamp(&caps[2])?)))
                });
                match parsed {
                    Some(Ok(times)) => current_times = Some(times),
                    Some(Err(e)) => {
                        warn!("Skipping entry with bad timestamp at line {}: {}", line_idx + 1, e);
                        current_seq_num = None;
                    }
                    None => {
                        warn!("Invalid timestamp line {}: {}", line_idx + 1, trimmed);
                        current_seq_num = None;
                    }
                }
                continue;
            }

            if !current_text.is_empty() {
                current_text.push('\n');
            }
            current_text.push_str(trimmed);
        }

        if let (Some(seq_num), Some((start, end))) = (current_seq_num, current_times) {
            add_current_entry(seq_num, start, end, &current_text);
        }

        if entries.is_empty() {
            return Err(anyhow!("No valid subtitle entries were found in the SRT content"));
        }

        entries.sort_by(|a, b| a.start_secs.total_cmp(&b.start_secs));

        let overlap_count = entries
            .windows(2)
            .filter(|pair| pair[0].end_secs > pair[1].start_secs)
            .count();
        if overlap_count > 0 {
            warn!("Found {} overlapping subtitle entries", overlap_count);
        }

        for (i, entry) in entries.iter_mut().enumerate() {
            entry.seq_num = i + 1;
        }

        Ok(entries)
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Language: {}", self.language)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
