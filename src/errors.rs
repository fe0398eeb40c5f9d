/*!
 * Error types for the subcue application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur while turning timestamped words into cues
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SegmentError {
    /// A segmentation parameter is out of range
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in the configuration
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// A transcript word is missing a required field or carries an unusable value
    #[error("Malformed word {word} in segment {segment}: {reason}")]
    MalformedWord {
        /// Zero-based position of the segment in the transcript
        segment: usize,
        /// Zero-based position of the word inside its segment
        word: usize,
        /// What is wrong with the word
        reason: String,
    },
}

/// Errors that can occur when running the external transcriber
#[derive(Error, Debug)]
pub enum TranscriberError {
    /// The transcriber process could not be started
    #[error("Failed to launch transcriber '{command}': {message}")]
    LaunchFailed {
        /// Command that was executed
        command: String,
        /// Underlying error message
        message: String,
    },

    /// The transcriber ran but reported a failure
    #[error("Transcriber exited with failure: {0}")]
    ProcessFailed(String),

    /// The transcriber did not finish in time
    #[error("Transcriber timed out after {0} seconds")]
    Timeout(u64),

    /// The transcriber finished but its output is missing or unreadable
    #[error("Transcriber output unavailable: {0}")]
    OutputMissing(String),
}
