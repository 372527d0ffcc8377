/*!
 * The translation pass over a presentation.
 *
 * Walks slides, shapes and paragraphs in document order, translating each
 * paragraph's aggregated text and redistributing the result into its runs.
 * Calls are strictly sequential: the free endpoint rate-limits aggressively
 * and the document is mutated in place, so there is nothing to parallelize.
 */

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use log::{debug, warn};

use crate::presentation::{Presentation, TextFrame};
use crate::translation::core::TranslationService;
use crate::translation::paragraph::{aggregate_runs, redistribute};

/// One translation pass over a presentation
pub struct TranslationPass<'a> {
    /// Service handling the actual backend calls
    service: &'a TranslationService,
    /// Source language code, or "auto"
    source_language: String,
    /// Target language code
    target_language: String,
}

impl<'a> TranslationPass<'a> {
    /// Create a pass for one language pair
    pub fn new(
        service: &'a TranslationService,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            service,
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }

    /// Run the pass over every slide.
    ///
    /// Returns the number of paragraphs that received a translation. A shape
    /// that fails is logged and skipped; the pass always reaches the end so
    /// the save step gets whatever was successfully rewritten.
    pub async fn run(
        &self,
        presentation: &mut Presentation,
        progress: Option<&ProgressBar>,
    ) -> usize {
        let mut translated_paragraphs = 0;

        for slide in &mut presentation.slides {
            for shape in &mut slide.shapes {
                let Some(frame) = shape.text_frame_mut() else {
                    continue;
                };

                match self.process_frame(frame).await {
                    Ok(count) => translated_paragraphs += count,
                    Err(e) => {
                        warn!(
                            "Skipping shape on {}: {:#}",
                            slide.archive_path, e
                        );
                    }
                }

                if let Some(progress) = progress {
                    progress.inc(1);
                }
            }
        }

        translated_paragraphs
    }

    /// Translate every paragraph of one text frame
    async fn process_frame(&self, frame: &mut TextFrame) -> Result<usize> {
        let mut translated = 0;

        for paragraph in &mut frame.paragraphs {
            // Empty or whitespace-only paragraphs never reach the backend
            if paragraph.text().trim().is_empty() {
                continue;
            }

            let Some(aggregate) = aggregate_runs(paragraph) else {
                continue;
            };

            let result = self
                .service
                .translate_text(&aggregate.text, &self.source_language, &self.target_language)
                .await
                .with_context(|| format!("Failed to translate {:?}", aggregate.text));

            match result {
                Ok(translation) if translation.trim().is_empty() => {
                    // Backend answered with nothing usable; keep the original
                    warn!(
                        "Empty translation for {:?}, keeping original text",
                        aggregate.text
                    );
                }
                Ok(translation) => {
                    redistribute(paragraph, &aggregate.run_indices, &translation);
                    translated += 1;
                }
                Err(e) => {
                    warn!("{:#}; keeping original text", e);
                }
            }
        }

        debug!("Frame processed, {} paragraph(s) translated", translated);
        Ok(translated)
    }
}
