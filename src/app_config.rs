use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code, or "auto" for backend detection
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (e.g. "en", "es")
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Folder layout for archived originals and translated output
    #[serde(default)]
    pub folders: FolderConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google web translation (free endpoint)
    #[default]
    Google,
    // @provider: OpenAI chat completions
    OpenAI,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Google => "Google",
            Self::OpenAI => "OpenAI",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Google => "google".to_string(),
            Self::OpenAI => "openai".to_string(),
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "openai" => Ok(Self::OpenAI),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    // @field: API key for the OpenAI provider; OPENAI_API_KEY is the fallback
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Chat-completions endpoint
    #[serde(default = "default_openai_endpoint")]
    pub endpoint: String,

    // @field: Model name for the OpenAI provider
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// Temperature parameter for text generation (0.0 to 1.0)
    /// Lower values make output more deterministic, higher values more creative
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Completion length cap per paragraph
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Rate limit delay in milliseconds between consecutive web-translation requests
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            api_key: String::new(),
            endpoint: default_openai_endpoint(),
            model: default_openai_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
        }
    }
}

impl TranslationConfig {
    /// Get the API key for the OpenAI provider, falling back to the
    /// OPENAI_API_KEY environment variable when the config leaves it empty
    pub fn resolved_api_key(&self) -> String {
        if !self.api_key.is_empty() {
            return self.api_key.clone();
        }
        std::env::var("OPENAI_API_KEY").unwrap_or_default()
    }
}

/// Folder layout for file housekeeping
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FolderConfig {
    /// Directory inputs are archived into before translation
    #[serde(default = "default_originals_dir")]
    pub originals_dir: PathBuf,

    /// Directory translated presentations are written into
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            originals_dir: default_originals_dir(),
            output_dir: default_output_dir(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_source_language() -> String {
    "auto".to_string()
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_rate_limit_delay_ms() -> u64 {
    500 // 500ms default delay between requests
}

fn default_originals_dir() -> PathBuf {
    PathBuf::from("originals")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("translated")
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| anyhow!("Failed to open config file {:?}: {}", path, e))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path, e))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.target_language.trim().is_empty() {
            return Err(anyhow!("Target language must not be empty"));
        }

        // The web provider needs no credential; the LLM provider does
        if self.translation.provider == TranslationProvider::OpenAI
            && self.translation.resolved_api_key().is_empty()
        {
            return Err(anyhow!(
                "An API key is required for the OpenAI provider. \
                 Set translation.api_key in the config file or the OPENAI_API_KEY environment variable."
            ));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            folders: FolderConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
