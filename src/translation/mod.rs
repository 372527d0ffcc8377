/*!
 * Translation of presentation text using the configured backend.
 *
 * This module contains the core of the application, split into:
 *
 * - `core`: the translation service and provider dispatch
 * - `paragraph`: run aggregation and redistribution within one paragraph
 * - `walker`: the document pass over slides, shapes and paragraphs
 */

// Re-export main types for easier usage
pub use self::core::TranslationService;
pub use self::paragraph::{aggregate_runs, redistribute, RunAggregate};
pub use self::walker::TranslationPass;

// Submodules
pub mod core;
pub mod paragraph;
pub mod walker;
