use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @checks: Presentation container extension (.pptx/.ppt, case-insensitive)
    pub fn is_presentation_file<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                ext == "pptx" || ext == "ppt"
            })
            .unwrap_or(false)
    }

    // @generates: Output path for a translated presentation
    // @params: input_file, output_dir, target_language
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        target_language: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();
        let extension = input_file
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_else(|| "pptx".to_string());

        let output_filename = format!("{}_translated_{}.{}", stem, target_language, extension);
        output_dir.as_ref().join(output_filename)
    }

    /// Output path with a timestamp suffix, used when the plain output path
    /// exists and cannot be written to.
    pub fn timestamped_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        target_language: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();
        let extension = input_file
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_else(|| "pptx".to_string());
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");

        let output_filename = format!(
            "{}_translated_{}_{}.{}",
            stem, target_language, timestamp, extension
        );
        output_dir.as_ref().join(output_filename)
    }

    /// Probe whether an existing path accepts writes.
    ///
    /// Mirrors the append-open trick office suites defeat: a file held open
    /// by another application (or replaced by a directory) fails the probe.
    /// Non-existent paths are considered writable.
    pub fn is_path_writable<P: AsRef<Path>>(path: P) -> bool {
        let path = path.as_ref();
        if !path.exists() {
            return true;
        }
        OpenOptions::new().append(true).open(path).is_ok()
    }

    /// Copy a file into the originals archive directory unless it already
    /// lives there. Returns the path inside the archive; processing continues
    /// from that copy.
    pub fn archive_original<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        originals_dir: P2,
    ) -> Result<PathBuf> {
        let input_file = input_file.as_ref();
        let originals_dir = originals_dir.as_ref();

        Self::ensure_dir(originals_dir)?;

        // Already archived? Compare canonical parent against the archive dir.
        let canonical_dir = originals_dir
            .canonicalize()
            .with_context(|| format!("Failed to resolve originals directory: {:?}", originals_dir))?;
        if let Some(parent) = input_file.parent() {
            if let Ok(canonical_parent) = parent.canonicalize() {
                if canonical_parent == canonical_dir {
                    return Ok(input_file.to_path_buf());
                }
            }
        }

        let file_name = input_file
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("Input path has no file name: {:?}", input_file))?;
        let archived = originals_dir.join(file_name);

        fs::copy(input_file, &archived)
            .with_context(|| format!("Failed to copy {:?} into {:?}", input_file, originals_dir))?;

        Ok(archived)
    }
}
