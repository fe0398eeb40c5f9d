use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Extensions the external transcriber can read
const MEDIA_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "m4a", "flac", "ogg", "opus", "aac", "wma",
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v",
    "mpg", "mpeg", "ts",
];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    // @generates: Output path for the subtitle file
    // @params: input_file, output_dir, explicit file name override
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        output_file: Option<&str>,
    ) -> PathBuf {
        let output_dir = output_dir.as_ref();

        if let Some(name) = output_file.map(str::trim).filter(|n| !n.is_empty()) {
            return output_dir.join(name);
        }

        let stem = input_file.as_ref().file_stem().unwrap_or_default();
        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push_str(".srt");

        output_dir.join(output_filename)
    }

    /// Find files whose type is one of `wanted` under a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, wanted: &[FileType]) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && wanted.contains(&Self::file_type_from_extension(path)) {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir(parent)?;
            }
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Detect whether a file is a word-timestamp transcript, a subtitle file or media
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        Ok(Self::file_type_from_extension(path))
    }

    fn file_type_from_extension(path: &Path) -> FileType {
        let Some(ext) = path.extension() else {
            return FileType::Unknown;
        };
        let ext_str = ext.to_string_lossy().to_lowercase();

        match ext_str.as_str() {
            "json" => FileType::Transcript,
            "srt" => FileType::Subtitle,
            e if MEDIA_EXTENSIONS.contains(&e) => FileType::Media,
            _ => FileType::Unknown,
        }
    }
}

/// Enum representing different file types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Transcript JSON with word timestamps
    Transcript,
    /// Subtitle file (SRT)
    Subtitle,
    /// Audio or video file for the external transcriber
    Media,
    /// Unknown file type
    Unknown,
}
