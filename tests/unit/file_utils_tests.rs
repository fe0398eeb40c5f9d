/*!
 * Tests for file utility functions
 */

use std::path::Path;
use anyhow::Result;
use subcue::file_utils::{FileManager, FileType};
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

/// Test that generate_output_path derives the name from the input
#[test]
fn test_generate_output_path_withoutOverride_shouldUseInputStem() {
    let output_path = FileManager::generate_output_path(
        Path::new("/tmp/input/lecture.mp4"),
        Path::new("/tmp/output"),
        None,
    );
    assert_eq!(output_path, Path::new("/tmp/output/lecture.srt"));
}

#[test]
fn test_generate_output_path_withOverride_shouldUseGivenName() {
    let output_path = FileManager::generate_output_path(
        Path::new("/tmp/input/lecture.mp4"),
        Path::new("/tmp/output"),
        Some("custom.srt"),
    );
    assert_eq!(output_path, Path::new("/tmp/output/custom.srt"));

    let blank = FileManager::generate_output_path(Path::new("a.json"), Path::new("out"), Some("  "));
    assert_eq!(blank, Path::new("out/a.srt"));
}

#[test]
fn test_detect_file_type_withKnownExtensions_shouldClassify() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();

    let transcript = common::create_test_file(dir, "talk.JSON", "{}")?;
    let subtitle = common::create_test_file(dir, "talk.srt", "")?;
    let media = common::create_test_file(dir, "talk.mp3", "")?;
    let other = common::create_test_file(dir, "notes.txt", "")?;

    assert_eq!(FileManager::detect_file_type(&transcript)?, FileType::Transcript);
    assert_eq!(FileManager::detect_file_type(&subtitle)?, FileType::Subtitle);
    assert_eq!(FileManager::detect_file_type(&media)?, FileType::Media);
    assert_eq!(FileManager::detect_file_type(&other)?, FileType::Unknown);
    assert!(FileManager::detect_file_type(dir.join("missing.json")).is_err());
    Ok(())
}

#[test]
fn test_find_files_withNestedDirectory_shouldReturnWantedTypes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("nested");
    FileManager::ensure_dir(&nested)?;

    common::create_test_file(temp_dir.path(), "a.json", "{}")?;
    common::create_test_file(&nested, "b.wav", "")?;
    common::create_test_file(&nested, "c.srt", "")?;

    let found = FileManager::find_files(temp_dir.path(), &[FileType::Transcript, FileType::Media])?;
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|p| p.extension().unwrap() != "srt"));
    Ok(())
}

#[test]
fn test_write_to_file_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("deep").join("dir").join("out.txt");

    FileManager::write_to_file(&path, "content")?;
    assert_eq!(FileManager::read_to_string(&path)?, "content");
    Ok(())
}
