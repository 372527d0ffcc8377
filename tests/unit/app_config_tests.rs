/*!
 * Tests for application configuration
 */

use anyhow::Result;
use std::str::FromStr;

use crate::common;
use decktrans::app_config::{Config, TranslationProvider};

/// Test that the default configuration matches the documented defaults
#[test]
fn test_default_config_withNoOverrides_shouldUseDocumentedDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "auto");
    assert_eq!(config.target_language, "en");
    assert_eq!(config.translation.provider, TranslationProvider::Google);
    assert_eq!(config.translation.rate_limit_delay_ms, 500);
    assert_eq!(config.translation.temperature, 0.3);
    assert_eq!(config.translation.max_tokens, 1024);
    assert_eq!(config.folders.originals_dir.to_str(), Some("originals"));
    assert_eq!(config.folders.output_dir.to_str(), Some("translated"));
}

/// Test provider parsing from strings
#[test]
fn test_provider_from_str_withValidNames_shouldParse() {
    assert_eq!(
        TranslationProvider::from_str("google").unwrap(),
        TranslationProvider::Google
    );
    assert_eq!(
        TranslationProvider::from_str("OpenAI").unwrap(),
        TranslationProvider::OpenAI
    );
    assert!(TranslationProvider::from_str("deepl").is_err());
}

/// Test provider display formatting
#[test]
fn test_provider_display_withBothVariants_shouldFormatLowercase() {
    assert_eq!(TranslationProvider::Google.to_string(), "google");
    assert_eq!(TranslationProvider::OpenAI.to_string(), "openai");
    assert_eq!(TranslationProvider::OpenAI.display_name(), "OpenAI");
}

/// Test that the Google provider validates without a credential
#[test]
fn test_validate_withGoogleProvider_shouldNotRequireApiKey() {
    let config = Config::default();
    assert!(config.validate().is_ok());
}

/// Test that the OpenAI provider accepts a configured credential
#[test]
fn test_validate_withOpenAiAndApiKey_shouldAcceptConfiguredKey() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::OpenAI;
    config.translation.api_key = "sk-test".to_string();

    assert!(config.validate().is_ok());
    assert_eq!(config.translation.resolved_api_key(), "sk-test");
}

/// Test that a partial config file is filled with defaults
#[test]
fn test_load_withPartialConfigFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = temp_dir.path().join("conf.json");
    std::fs::write(
        &config_path,
        r#"{ "target_language": "fr", "translation": { "provider": "openai" } }"#,
    )?;

    let config = Config::load(&config_path)?;

    assert_eq!(config.target_language, "fr");
    assert_eq!(config.source_language, "auto");
    assert_eq!(config.translation.provider, TranslationProvider::OpenAI);
    assert_eq!(config.translation.model, "gpt-3.5-turbo");
    assert_eq!(config.translation.endpoint, "https://api.openai.com/v1");

    Ok(())
}

/// Test that loading a missing config file fails
#[test]
fn test_load_withMissingFile_shouldFail() {
    assert!(Config::load("does_not_exist_conf.json").is_err());
}
