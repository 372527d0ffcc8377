// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use decktrans::app_config::{self, Config, TranslationProvider};
use decktrans::app_controller::Controller;
use decktrans::file_utils::FileManager;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Google,
    OpenAI,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Google => TranslationProvider::Google,
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for decktrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// decktrans - AI-powered PowerPoint presentation translator
///
/// Translates every paragraph of a presentation while preserving slide
/// structure and per-run formatting slots.
#[derive(Parser, Debug)]
#[command(name = "decktrans")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered PowerPoint presentation translator")]
#[command(long_about = "decktrans translates the text of a PowerPoint presentation into another
language, preserving the slide structure and per-run formatting.

USAGE:
    decktrans <FILE> <TARGET_LANG> [SOURCE_LANG] [PROVIDER]

EXAMPLES:
    decktrans deck.pptx en es           # Spanish deck to English
    decktrans deck.pptx fr              # Auto-detect source, translate to French
    decktrans deck.pptx en es openai    # Use the OpenAI provider
    decktrans completions bash          # Generate bash completions

PROVIDERS:
    google    - Free web-translation endpoint (default, no credential)
    openai    - OpenAI chat completions (requires OPENAI_API_KEY)

FILES:
    The input is copied into the 'originals' folder before translation and
    the result is written into the 'translated' folder as
    <name>_translated_<lang>.pptx. Optional settings live in conf.json.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Presentation file to translate (.pptx or .ppt)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Target language code (e.g. 'en', 'es', 'fr')
    #[arg(value_name = "TARGET_LANG")]
    target_language: Option<String>,

    /// Source language code, or 'auto' for detection
    #[arg(value_name = "SOURCE_LANG")]
    source_language: Option<String>,

    /// Translation provider to use
    #[arg(value_name = "PROVIDER", value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "decktrans", &mut std::io::stdout());
            Ok(())
        }
        None => run_translate(cli).await,
    }
}

async fn run_translate(options: CommandLineOptions) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Both positionals are required for a translation run; anything less
    // gets the usage text, not an error
    let (Some(input_file), Some(target_language)) =
        (options.file.clone(), options.target_language.clone())
    else {
        CommandLineOptions::command().print_long_help()?;
        return Ok(());
    };

    // Load configuration when present, otherwise run on defaults
    let mut config = if Path::new(&options.config_path).exists() {
        Config::load(&options.config_path)?
    } else {
        Config::default()
    };

    // Override config with CLI options
    config.target_language = target_language;
    if let Some(source_language) = &options.source_language {
        config.source_language = source_language.clone();
    }
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    } else {
        log::set_max_level(level_filter(&config.log_level));
    }

    // Fatal validations: bad input path, wrong extension, missing credential
    if !FileManager::file_exists(&input_file) {
        return Err(anyhow!("The file {:?} does not exist.", input_file));
    }
    if !FileManager::is_presentation_file(&input_file) {
        return Err(anyhow!(
            "The file must be a PowerPoint presentation (.pptx or .ppt)."
        ));
    }
    config.validate()?;

    if decktrans::language_utils::is_auto(&config.target_language) {
        warn!("Target language is 'auto'; the backend will pick a language");
    }

    let controller = Controller::with_config(config)?;
    let output_path = controller.run(input_file).await?;

    info!("Translated presentation saved as: {:?}", output_path);
    Ok(())
}
