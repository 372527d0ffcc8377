/*!
 * # decktrans
 *
 * A Rust tool for automatic translation of PowerPoint presentations.
 *
 * ## Features
 *
 * - Translate every paragraph of a presentation while preserving slide
 *   structure and per-run formatting slots
 * - Paragraph runs are concatenated and translated as whole sentences,
 *   then redistributed into the original run structure
 * - Two interchangeable backends: the free Google web endpoint and the
 *   OpenAI chat-completions API
 * - Originals are archived before translation; output names derive from
 *   the input, with a timestamped fallback on collisions
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `presentation`: Presentation model and PPTX container I/O
 * - `translation`: Translation of presentation text:
 *   - `translation::core`: Translation service and provider dispatch
 *   - `translation::paragraph`: Run aggregation and redistribution
 *   - `translation::walker`: The document translation pass
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: Language display-name lookup
 * - `providers`: Client implementations for the translation backends:
 *   - `providers::google`: Free web-translation client
 *   - `providers::openai`: OpenAI API client
 *   - `providers::mock`: Scripted provider for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod presentation;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{AppError, DocumentError, ProviderError};
pub use presentation::{Paragraph, Presentation, Run, Shape, Slide, TextFrame};
pub use translation::{TranslationPass, TranslationService};
