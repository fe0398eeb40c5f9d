/*!
 * Cue segmentation: groups a flat stream of timestamped words into subtitle cues.
 *
 * The scan is a fold over the words. A pending buffer collects words until one
 * of three triggers closes it:
 * - the buffer reaches `max_words_per_cue` words,
 * - a word ends a sentence (`.`, `!` or `?`),
 * - the silence before the next word exceeds `pause_threshold`.
 *
 * Pause and sentence-end closures seen on an incoming word end the cue at the
 * previous word's end, so a long silence stays uncovered between two cues.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::SegmentError;
use crate::subtitle_processor::SubtitleEntry;
use crate::transcript::{Transcript, Word};

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Parameters for one segmentation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationParams {
    /// Maximum number of words in one cue
    #[serde(default = "default_max_words_per_cue")]
    pub max_words_per_cue: usize,

    /// Silence in seconds between two words that forces a new cue
    #[serde(default = "default_pause_threshold")]
    pub pause_threshold: f64,

    /// Emit cues whose text normalizes to an empty string.
    /// When false such cues are dropped and do not consume a sequence number.
    #[serde(default = "default_keep_empty_cues")]
    pub keep_empty_cues: bool,
}

fn default_max_words_per_cue() -> usize {
    3
}

fn default_pause_threshold() -> f64 {
    1.0
}

fn default_keep_empty_cues() -> bool {
    true
}

impl Default for SegmentationParams {
    fn default() -> Self {
        Self {
            max_words_per_cue: default_max_words_per_cue(),
            pause_threshold: default_pause_threshold(),
            keep_empty_cues: default_keep_empty_cues(),
        }
    }
}

impl SegmentationParams {
    pub fn new(max_words_per_cue: usize, pause_threshold: f64) -> Self {
        Self {
            max_words_per_cue,
            pause_threshold,
            ..Self::default()
        }
    }

    /// Reject out-of-range parameters before any word is processed
    pub fn validate(&self) -> Result<(), SegmentError> {
        if self.max_words_per_cue == 0 {
            return Err(SegmentError::InvalidParameter {
                name: "max_words_per_cue",
                reason: "must be at least 1".to_string(),
            });
        }

        if !self.pause_threshold.is_finite() || self.pause_threshold < 0.0 {
            return Err(SegmentError::InvalidParameter {
                name: "pause_threshold",
                reason: format!("must be a finite number >= 0, got {}", self.pause_threshold),
            });
        }

        Ok(())
    }
}

/// True when the word closes a sentence
pub fn is_sentence_end(text: &str) -> bool {
    text.trim().ends_with(['.', '!', '?'])
}

/// Collapse whitespace runs to a single space and trim both ends
pub fn normalize_text(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text.trim(), " ").into_owned()
}

/// Fold state carried from one word to the next
#[derive(Debug, Default)]
pub struct SegmentationState {
    pending_words: Vec<Word>,
    pending_start: Option<f64>,
    prev_word_end: f64,
    cues: Vec<SubtitleEntry>,
}

impl SegmentationState {
    /// Advance the scan by one word
    pub fn step(mut self, word: &Word, params: &SegmentationParams) -> Self {
        if word.start < self.prev_word_end {
            warn!(
                "Word '{}' starts at {:.3}s before the previous word ends at {:.3}s",
                word.text.trim(), word.start, self.prev_word_end
            );
        }

        if self.pending_words.is_empty() {
            self.pending_start = Some(word.start);
        }

        let long_pause = word.start - self.prev_word_end > params.pause_threshold;
        let sentence_closed = self
            .pending_words
            .last()
            .is_some_and(|last| is_sentence_end(&last.text));

        if (long_pause || sentence_closed) && !self.pending_words.is_empty() {
            let end = self.prev_word_end;
            self.flush(end, params);
            self.pending_start = Some(word.start);
        }

        self.pending_words.push(word.clone());

        if self.pending_words.len() == params.max_words_per_cue || is_sentence_end(&word.text) {
            self.flush(word.end, params);
        }

        self.prev_word_end = word.end;
        self
    }

    /// Flush whatever is still buffered and return the cues
    pub fn finish(mut self, params: &SegmentationParams) -> Vec<SubtitleEntry> {
        if let Some(end) = self.pending_words.last().map(|w| w.end) {
            self.flush(end, params);
        }
        self.cues
    }

    /// Number of cues emitted so far
    pub fn cue_count(&self) -> usize {
        self.cues.len()
    }

    fn flush(&mut self, end: f64, params: &SegmentationParams) {
        let joined = self
            .pending_words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let text = normalize_text(&joined);
        // pending_start is always set while words are buffered
        let start = self.pending_start.take().unwrap_or(end);
        self.pending_words.clear();

        if text.is_empty() && !params.keep_empty_cues {
            debug!("Dropping empty cue spanning {:.3}s - {:.3}s", start, end);
            return;
        }

        if end < start {
            warn!("Cue '{}' ends at {:.3}s before it starts at {:.3}s", text, end, start);
        }

        let seq_num = self.cues.len() + 1;
        self.cues.push(SubtitleEntry::new(seq_num, start, end, text));
    }
}

/// Stateless entry point for cue segmentation
#[derive(Debug, Clone, Default)]
pub struct CueSegmenter {
    params: SegmentationParams,
}

impl CueSegmenter {
    /// Create a segmenter after validating its parameters
    pub fn new(params: SegmentationParams) -> Result<Self, SegmentError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SegmentationParams {
        &self.params
    }

    /// Segment a flat word stream into numbered cues
    pub fn segment<'a, I>(&self, words: I) -> Vec<SubtitleEntry>
    where
        I: IntoIterator<Item = &'a Word>,
    {
        let params = &self.params;
        let cues = words
            .into_iter()
            .fold(SegmentationState::default(), |state, word| state.step(word, params))
            .finish(params);

        debug!("Segmented words into {} cues", cues.len());
        cues
    }

    /// Segment every word of a transcript, ignoring its segment boundaries
    pub fn segment_transcript(&self, transcript: &Transcript) -> Vec<SubtitleEntry> {
        self.segment(transcript.words())
    }
}

/// Validate the parameters and segment `words` in one call
pub fn segment(words: &[Word], params: &SegmentationParams) -> Result<Vec<SubtitleEntry>, SegmentError> {
    Ok(CueSegmenter::new(params.clone())?.segment(words))
}
