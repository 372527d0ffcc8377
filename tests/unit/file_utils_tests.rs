/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::common;
use decktrans::file_utils::FileManager;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = temp_dir.path().join("present.pptx");
    fs::write(&test_file, "content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path().join("missing.pptx")));

    Ok(())
}

/// Test the presentation extension check
#[test]
fn test_is_presentation_file_withVariousExtensions_shouldMatchCaseInsensitively() {
    assert!(FileManager::is_presentation_file("deck.pptx"));
    assert!(FileManager::is_presentation_file("deck.ppt"));
    assert!(FileManager::is_presentation_file("Deck.PPTX"));
    assert!(FileManager::is_presentation_file("/some/dir/Deck.Ppt"));
    assert!(!FileManager::is_presentation_file("deck.txt"));
    assert!(!FileManager::is_presentation_file("deck"));
}

/// Test that generate_output_path derives the documented name
#[test]
fn test_generate_output_path_withValidInputs_shouldCreateCorrectPath() {
    let input_file = Path::new("/tmp/input/deck.pptx");
    let output_dir = Path::new("/tmp/output");

    let output_path = FileManager::generate_output_path(input_file, output_dir, "es");

    assert_eq!(output_path, Path::new("/tmp/output/deck_translated_es.pptx"));
}

/// Test that the original extension is kept
#[test]
fn test_generate_output_path_withPptInput_shouldKeepExtension() {
    let output_path =
        FileManager::generate_output_path(Path::new("old.ppt"), Path::new("out"), "fr");

    assert_eq!(output_path, Path::new("out/old_translated_fr.ppt"));
}

/// Test that the collision fallback name carries a timestamp suffix
#[test]
fn test_timestamped_output_path_withValidInputs_shouldMatchPattern() {
    let output_path =
        FileManager::timestamped_output_path(Path::new("deck.pptx"), Path::new("out"), "es");

    let name = output_path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .to_string();
    let pattern = Regex::new(r"^deck_translated_es_\d{8}_\d{6}\.pptx$").unwrap();
    assert!(pattern.is_match(&name), "unexpected name: {}", name);
}

/// Test the writability probe
#[test]
fn test_is_path_writable_withVariousTargets_shouldProbeCorrectly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    // Non-existent paths are considered writable
    assert!(FileManager::is_path_writable(temp_dir.path().join("new.pptx")));

    // A plain file accepts appends
    let file = temp_dir.path().join("plain.pptx");
    fs::write(&file, "x")?;
    assert!(FileManager::is_path_writable(&file));

    // A directory squatting on the output path does not
    let blocked = temp_dir.path().join("blocked.pptx");
    fs::create_dir(&blocked)?;
    assert!(!FileManager::is_path_writable(&blocked));

    Ok(())
}

/// Test that archive_original copies the input byte-for-byte
#[test]
fn test_archive_original_withOutsideFile_shouldCopyIntoArchive() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = temp_dir.path().join("foo").join("bar.pptx");
    fs::create_dir_all(input.parent().unwrap())?;
    fs::write(&input, b"presentation bytes")?;
    let originals = temp_dir.path().join("originals");

    let archived = FileManager::archive_original(&input, &originals)?;

    assert_eq!(archived, originals.join("bar.pptx"));
    assert!(input.exists(), "archival must copy, not move");
    assert_eq!(fs::read(&archived)?, fs::read(&input)?);

    Ok(())
}

/// Test that a file already inside the archive is not copied again
#[test]
fn test_archive_original_withFileAlreadyArchived_shouldReturnSamePath() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let originals = temp_dir.path().join("originals");
    fs::create_dir_all(&originals)?;
    let input = originals.join("bar.pptx");
    fs::write(&input, b"bytes")?;

    let archived = FileManager::archive_original(&input, &originals)?;

    assert_eq!(archived, input);

    Ok(())
}

/// Test that ensure_dir creates directories as needed
#[test]
fn test_ensure_dir_withNonExistentDir_shouldCreateDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_subdir = temp_dir.path().join("nested").join("dir");

    FileManager::ensure_dir(&test_subdir)?;

    assert!(test_subdir.is_dir());

    Ok(())
}
