use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::presentation::Presentation;
use crate::translation::{TranslationPass, TranslationService};

// @module: Application controller for presentation translation

/// Main application controller for presentation translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Run the main workflow on one presentation file.
    ///
    /// Archives the input, translates every paragraph, and saves under the
    /// derived output name. Returns the path the result was written to.
    pub async fn run(&self, input_file: PathBuf) -> Result<PathBuf> {
        let service = TranslationService::new(self.config.translation.clone());
        self.run_with_service(input_file, service).await
    }

    /// Run the workflow with a caller-supplied translation service.
    ///
    /// This is the seam integration tests use with a scripted provider.
    pub async fn run_with_service(
        &self,
        input_file: PathBuf,
        service: TranslationService,
    ) -> Result<PathBuf> {
        let start_time = std::time::Instant::now();

        if !FileManager::file_exists(&input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }
        if !FileManager::is_presentation_file(&input_file) {
            return Err(anyhow!(
                "Input file must be a presentation (.pptx or .ppt): {:?}",
                input_file
            ));
        }

        // Keep a pristine copy; translation proceeds from the archived file
        let archived = FileManager::archive_original(&input_file, &self.config.folders.originals_dir)?;
        if archived != input_file {
            info!("Archived original to {:?}", archived);
        }

        let mut presentation =
            Presentation::open(&archived).context("Failed to open presentation")?;

        info!(
            "Translating {:?} from '{}' to '{}' using {}",
            archived,
            self.config.source_language,
            self.config.target_language,
            self.config.translation.provider.display_name()
        );

        let progress_bar = Self::build_progress_bar(presentation.text_shape_count() as u64);
        let pass = TranslationPass::new(
            &service,
            &self.config.source_language,
            &self.config.target_language,
        );
        let translated_count = pass.run(&mut presentation, Some(&progress_bar)).await;
        progress_bar.finish_and_clear();

        info!("Translated {} paragraph(s)", translated_count);

        let output_path = self.save_presentation(&presentation, &archived)?;

        info!(
            "Done in {}. Saved as {:?}",
            Self::format_duration(start_time.elapsed()),
            output_path
        );

        Ok(output_path)
    }

    /// Save the mutated presentation under the derived output name, with one
    /// timestamped retry when the path is taken or the save fails.
    fn save_presentation(&self, presentation: &Presentation, input_file: &Path) -> Result<PathBuf> {
        let output_dir = &self.config.folders.output_dir;
        FileManager::ensure_dir(output_dir)?;

        let mut output_path = FileManager::generate_output_path(
            input_file,
            output_dir,
            &self.config.target_language,
        );

        // An existing file another application holds open cannot be replaced;
        // switch to a timestamped name before even trying.
        if output_path.exists() && !FileManager::is_path_writable(&output_path) {
            let fallback = FileManager::timestamped_output_path(
                input_file,
                output_dir,
                &self.config.target_language,
            );
            warn!("Output file is in use, using alternate name: {:?}", fallback);
            output_path = fallback;
        }

        match presentation.save(&output_path) {
            Ok(()) => Ok(output_path),
            Err(e) => {
                let fallback = FileManager::timestamped_output_path(
                    input_file,
                    output_dir,
                    &self.config.target_language,
                );
                warn!(
                    "Could not save to {:?} ({}), retrying as {:?}",
                    output_path, e, fallback
                );
                presentation
                    .save(&fallback)
                    .context("Failed to save presentation under alternate name")?;
                Ok(fallback)
            }
        }
    }

    // @returns: Progress bar over text-carrying shapes
    fn build_progress_bar(total: u64) -> ProgressBar {
        let progress_bar = ProgressBar::new(total);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} shapes ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Translating");
        progress_bar
    }

    // @returns: Human-readable duration
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:01}s", seconds, duration.subsec_millis() / 100)
        }
    }
}
