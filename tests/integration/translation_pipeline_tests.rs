/*!
 * End-to-end presentation translation tests
 *
 * These drive the controller through archive, open, translate and save with
 * a scripted provider, asserting on the files actually written to disk.
 */

use anyhow::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::common;
use decktrans::app_config::Config;
use decktrans::app_controller::Controller;
use decktrans::presentation::Presentation;
use decktrans::providers::mock::{MockProvider, MockRequest};
use decktrans::translation::TranslationService;

fn workspace_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.source_language = "en".to_string();
    config.target_language = "es".to_string();
    config.folders.originals_dir = root.join("originals");
    config.folders.output_dir = root.join("translated");
    config
}

fn spanish_mock() -> MockProvider {
    MockProvider::working().with_custom_response(|request: &MockRequest| {
        match request.text.as_str() {
            "Hello world" => "Hola mundo".to_string(),
            other => format!("es:{}", other),
        }
    })
}

/// Test the full pipeline on a two-run paragraph
#[tokio::test]
async fn test_pipeline_withTwoRunParagraph_shouldSaveCollapsedTranslation() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = temp_dir.path().join("foo").join("bar.pptx");
    common::write_pptx(&input, &[common::slide_xml(&[vec!["Hello ", "world"]])])?;

    let controller = Controller::with_config(workspace_config(temp_dir.path()))?;
    let service = TranslationService::with_mock(spanish_mock());

    let output_path = controller.run_with_service(input.clone(), service).await?;

    assert_eq!(
        output_path,
        temp_dir.path().join("translated").join("bar_translated_es.pptx")
    );

    let translated = Presentation::open(&output_path)?;
    let frame = translated.slides[0].shapes[0].text_frame().unwrap();
    assert_eq!(frame.paragraphs[0].runs.len(), 2);
    assert_eq!(frame.paragraphs[0].runs[0].text, "Hola mundo");
    assert_eq!(frame.paragraphs[0].runs[1].text, "");

    Ok(())
}

/// Test the archival side effect copies the input byte-for-byte
#[tokio::test]
async fn test_pipeline_withOutsideInput_shouldArchiveIdenticalCopy() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = temp_dir.path().join("foo").join("bar.pptx");
    common::write_pptx(&input, &[common::slide_xml(&[vec!["Hello"]])])?;

    let controller = Controller::with_config(workspace_config(temp_dir.path()))?;
    let service = TranslationService::with_mock(spanish_mock());

    controller.run_with_service(input.clone(), service).await?;

    let archived = temp_dir.path().join("originals").join("bar.pptx");
    assert!(archived.exists());
    assert!(input.exists(), "archival must copy, not move");
    assert_eq!(fs::read(&archived)?, fs::read(&input)?);

    Ok(())
}

/// Test that an all-whitespace paragraph never invokes the provider
#[tokio::test]
async fn test_pipeline_withWhitespaceOnlyParagraph_shouldSkipTranslation() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = temp_dir.path().join("blank.pptx");
    common::write_pptx(&input, &[common::slide_xml(&[vec!["  ", " "]])])?;

    let controller = Controller::with_config(workspace_config(temp_dir.path()))?;
    let mock = spanish_mock();
    let calls = mock.call_counter();
    let service = TranslationService::with_mock(mock);

    let output_path = controller.run_with_service(input, service).await?;

    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);

    let translated = Presentation::open(&output_path)?;
    let frame = translated.slides[0].shapes[0].text_frame().unwrap();
    assert_eq!(frame.paragraphs[0].runs[0].text, "  ");
    assert_eq!(frame.paragraphs[0].runs[1].text, " ");

    Ok(())
}

/// Test the collision fallback produces a timestamp-suffixed name
#[tokio::test]
async fn test_pipeline_withUnwritableOutputPath_shouldFallBackToTimestampedName() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = temp_dir.path().join("bar.pptx");
    common::write_pptx(&input, &[common::slide_xml(&[vec!["Hello"]])])?;

    // A directory squatting on the computed output path defeats the save
    let blocked = temp_dir.path().join("translated").join("bar_translated_es.pptx");
    fs::create_dir_all(&blocked)?;

    let controller = Controller::with_config(workspace_config(temp_dir.path()))?;
    let service = TranslationService::with_mock(spanish_mock());

    let output_path = controller.run_with_service(input, service).await?;

    let name = output_path.file_name().unwrap().to_string_lossy().to_string();
    let pattern = Regex::new(r"^bar_translated_es_\d{8}_\d{6}\.pptx$").unwrap();
    assert!(pattern.is_match(&name), "unexpected name: {}", name);
    assert!(output_path.is_file());

    Ok(())
}

/// Test a failing provider still produces an output with the original text
#[tokio::test]
async fn test_pipeline_withFailingProvider_shouldSaveOriginalText() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = temp_dir.path().join("bar.pptx");
    common::write_pptx(&input, &[common::slide_xml(&[vec!["Hello ", "world"]])])?;

    let controller = Controller::with_config(workspace_config(temp_dir.path()))?;
    let service = TranslationService::with_mock(MockProvider::failing());

    let output_path = controller.run_with_service(input, service).await?;

    let translated = Presentation::open(&output_path)?;
    let frame = translated.slides[0].shapes[0].text_frame().unwrap();
    assert_eq!(frame.paragraphs[0].runs[0].text, "Hello ");
    assert_eq!(frame.paragraphs[0].runs[1].text, "world");

    Ok(())
}

/// Test fatal validation on inputs that are not presentations
#[tokio::test]
async fn test_pipeline_withWrongExtension_shouldFailBeforeProcessing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = temp_dir.path().join("notes.txt");
    fs::write(&input, "plain text")?;

    let controller = Controller::with_config(workspace_config(temp_dir.path()))?;
    let mock = spanish_mock();
    let calls = mock.call_counter();
    let service = TranslationService::with_mock(mock);

    let result = controller.run_with_service(input, service).await;

    assert!(result.is_err());
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    assert!(!temp_dir.path().join("originals").join("notes.txt").exists());

    Ok(())
}
