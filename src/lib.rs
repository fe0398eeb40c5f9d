/*!
 * # subcue - word timestamps to SubRip cues
 *
 * A Rust library that turns word-level speech-to-text timestamps into
 * readable SRT subtitle cues.
 *
 * ## Features
 *
 * - Group words into cues by word count, pauses and sentence ends
 * - Load whisper-style JSON transcripts with word timestamps
 * - Run an external transcriber (the `whisper` CLI) for audio and video inputs
 * - Write and read SRT files with unbounded hour timestamps
 * - ISO 639-1 and ISO 639-2 language code support for the transcriber
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `segmenter`: The cue segmentation fold
 * - `subtitle_processor`: Cue model, SRT timestamps, SRT reading and writing
 * - `transcript`: Word-level transcript model and JSON loading
 * - `transcriber`: Boundary to the external speech-to-text tool
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![cfg_attr(test, allow(non_snake_case))]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod segmenter;
pub mod subtitle_processor;
pub mod transcriber;
pub mod transcript;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{SegmentError, TranscriberError};
pub use segmenter::{CueSegmenter, SegmentationParams, segment};
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry};
pub use transcript::{Transcript, TranscriptSegment, Word};
