/*!
 * Integration tests for the transcript to SRT workflow
 */

use std::path::PathBuf;
use anyhow::Result;

use subcue::file_utils::FileManager;
use subcue::segmenter::{CueSegmenter, SegmentationParams};
use subcue::subtitle_processor::SubtitleCollection;
use subcue::transcript::{Transcript, Word};
use crate::common;

const EXPECTED_SAMPLE_SRT: &str = "1
00:00:00,000 --> 00:00:01,000
Hello there.

2
00:00:01,200 --> 00:00:01,600
This is a

3
00:00:01,600 --> 00:00:02,000
test

4
00:00:04,000 --> 00:00:04,600
of the cue

5
00:00:04,600 --> 00:00:06,000
splitter

";

/// Load a transcript, segment it, write it and read it back
#[test]
fn test_subtitle_workflow_withSampleTranscript_shouldWriteExpectedSrt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let transcript_path = common::create_test_transcript(temp_dir.path(), "talk.json")?;

    let transcript = Transcript::from_json_file(&transcript_path)?;
    let segmenter = CueSegmenter::new(SegmentationParams::default())?;
    let entries = segmenter.segment_transcript(&transcript);

    let collection = SubtitleCollection::from_entries(transcript_path.clone(), "en".to_string(), entries);
    let srt_path = temp_dir.path().join("out").join("talk.srt");
    collection.write_to_srt(&srt_path)?;

    let content = FileManager::read_to_string(&srt_path)?;
    assert_eq!(content, EXPECTED_SAMPLE_SRT);

    let parsed = SubtitleCollection::parse_srt_string(&content)?;
    assert_eq!(parsed.len(), 5);
    assert_eq!(parsed[3].text, "of the cue");
    assert!((parsed[3].end_secs - 4.6).abs() < 1e-9);

    Ok(())
}

/// Recordings longer than a day keep counting hours
#[test]
fn test_subtitle_workflow_withVeryLongRecording_shouldNotWrapHours() -> Result<()> {
    let words = vec![
        Word::new("still", 86_399.5, 86_399.9),
        Word::new("talking.", 86_400.0, 86_400.75),
    ];
    let segmenter = CueSegmenter::new(SegmentationParams::default())?;
    let collection = SubtitleCollection::from_entries(
        PathBuf::from("marathon.json"),
        "en".to_string(),
        segmenter.segment(&words),
    );

    assert_eq!(
        collection.to_srt_string(),
        "1\n23:59:59,500 --> 24:00:00,750\nstill talking.\n\n"
    );
    Ok(())
}

/// An empty transcript produces an empty file
#[test]
fn test_subtitle_workflow_withNoWords_shouldWriteEmptyFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let transcript = Transcript::from_json_str(r#"{"segments": []}"#)?;
    let entries = CueSegmenter::new(SegmentationParams::default())?.segment_transcript(&transcript);

    let collection = SubtitleCollection::from_entries(PathBuf::from("silence.json"), "en".to_string(), entries);
    let srt_path = temp_dir.path().join("silence.srt");
    collection.write_to_srt(&srt_path)?;

    assert_eq!(FileManager::read_to_string(&srt_path)?, "");
    Ok(())
}
