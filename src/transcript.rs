use std::path::Path;
use anyhow::{Result, Context, anyhow};
use log::{warn, debug};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::SegmentError;

// @module: Word-level transcript model produced by the external transcriber

/// One recognized token with its time span in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Token text, possibly with leading whitespace as emitted by the recognizer
    pub text: String,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
}

impl Word {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }
}

/// A recognizer segment; its boundaries are not cue boundaries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start: Option<f64>,
    pub end: Option<f64>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub words: Vec<Word>,
}

/// Whole transcript as returned by the transcriber
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Language detected or forced by the transcriber
    #[serde(default)]
    pub language: Option<String>,
    /// Full transcript text
    #[serde(default)]
    pub text: String,
    /// Ordered segments
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
}

// Wire shapes. Word fields stay loose so a missing or non-numeric field is
// reported with its position instead of a generic parse error.
#[derive(Debug, Deserialize)]
struct RawTranscript {
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    segments: Option<Vec<RawSegment>>,
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    #[serde(default)]
    start: Option<f64>,
    #[serde(default)]
    end: Option<f64>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    words: Option<Vec<RawWord>>,
}

#[derive(Debug, Deserialize)]
struct RawWord {
    #[serde(default)]
    word: Option<Value>,
    #[serde(default)]
    text: Option<Value>,
    #[serde(default)]
    start: Option<Value>,
    #[serde(default)]
    end: Option<Value>,
}

impl RawWord {
    fn into_word(self, segment: usize, word: usize) -> Result<Word, SegmentError> {
        let malformed = |reason: String| SegmentError::MalformedWord { segment, word, reason };

        // Some recognizers emit "text" instead of "word"; "word" wins when both are set
        let text = match self.word {
            None | Some(Value::Null) => Self::token(self.text, "text"),
            word => Self::token(word, "word"),
        }
        .map_err(malformed)?;
        let start = Self::seconds(self.start, "start").map_err(malformed)?;
        let end = Self::seconds(self.end, "end").map_err(malformed)?;

        Ok(Word { text, start, end })
    }

    fn token(value: Option<Value>, field: &str) -> Result<String, String> {
        match value {
            None | Some(Value::Null) => Err("missing field 'word'".to_string()),
            Some(Value::String(text)) => Ok(text),
            Some(v) => Err(format!("field '{}' is not a string: {}", field, v)),
        }
    }

    fn seconds(value: Option<Value>, field: &str) -> Result<f64, String> {
        match value {
            None | Some(Value::Null) => Err(format!("missing field '{}'", field)),
            Some(v) => v
                .as_f64()
                .filter(|secs| secs.is_finite())
                .ok_or_else(|| format!("field '{}' is not a number: {}", field, v)),
        }
    }
}

impl Transcript {
    /// Build a transcript holding a single segment with the given words
    pub fn from_words(words: Vec<Word>) -> Self {
        let text = words.iter().map(|w| w.text.as_str()).collect::<Vec<_>>().join(" ");
        Self {
            language: None,
            text: text.clone(),
            segments: vec![TranscriptSegment {
                start: words.first().map(|w| w.start),
                end: words.last().map(|w| w.end),
                text,
                words,
            }],
        }
    }

    /// Parse whisper-style JSON with word timestamps
    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: RawTranscript = serde_json::from_str(content)
            .context("Failed to parse transcript JSON")?;

        let raw_segments = raw
            .segments
            .ok_or_else(|| anyhow!("Transcript JSON has no 'segments' array"))?;

        let mut segments = Vec::with_capacity(raw_segments.len());
        for (seg_idx, raw_segment) in raw_segments.into_iter().enumerate() {
            let raw_words = match raw_segment.words {
                Some(words) => words,
                None => {
                    warn!("Segment {} has no word timestamps; was the transcriber run with word timestamps enabled?", seg_idx);
                    Vec::new()
                }
            };

            let words = raw_words
                .into_iter()
                .enumerate()
                .map(|(word_idx, raw_word)| raw_word.into_word(seg_idx, word_idx))
                .collect::<Result<Vec<_>, _>>()?;

            segments.push(TranscriptSegment {
                start: raw_segment.start,
                end: raw_segment.end,
                text: raw_segment.text,
                words,
            });
        }

        let transcript = Self {
            language: raw.language,
            text: raw.text,
            segments,
        };
        debug!(
            "Parsed transcript with {} segments and {} words",
            transcript.segments.len(),
            transcript.word_count()
        );
        Ok(transcript)
    }

    /// Read and parse a transcript JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript file: {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid transcript file: {}", path.display()))
    }

    /// All words of all segments as one stream, segment boundaries dropped
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.segments.iter().flat_map(|segment| segment.words.iter())
    }

    pub fn word_count(&self) -> usize {
        self.segments.iter().map(|segment| segment.words.len()).sum()
    }
}
