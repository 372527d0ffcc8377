/*!
 * Core translation service implementation.
 *
 * This module contains the main TranslationService struct, which dispatches
 * paragraph text to whichever backend was selected at construction time.
 */

use log::debug;
use std::time::Duration;

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::ProviderError;
use crate::language_utils::language_display_name;
use crate::providers::google::{GoogleRequest, GoogleTranslate};
use crate::providers::mock::{MockProvider, MockRequest};
use crate::providers::openai::{OpenAI, OpenAIRequest};
use crate::providers::Provider;

/// Translation provider implementation variants
enum TranslationProviderImpl {
    /// Free Google web-translation endpoint
    Google {
        /// Client instance
        client: GoogleTranslate,
    },

    /// OpenAI chat-completions API
    OpenAI {
        /// Client instance
        client: OpenAI,
    },

    /// Scripted provider, reachable only through `with_mock`
    Mock {
        /// Client instance
        client: MockProvider,
    },
}

/// Main translation service for presentation text
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: TranslationConfig) -> Self {
        let provider = match config.provider {
            ConfigTranslationProvider::Google => TranslationProviderImpl::Google {
                client: GoogleTranslate::new(),
            },
            ConfigTranslationProvider::OpenAI => TranslationProviderImpl::OpenAI {
                client: OpenAI::new(config.resolved_api_key(), config.endpoint.clone()),
            },
        };

        Self { provider, config }
    }

    /// Create a service backed by a scripted provider, for tests
    pub fn with_mock(client: MockProvider) -> Self {
        Self {
            provider: TranslationProviderImpl::Mock { client },
            config: TranslationConfig::default(),
        }
    }

    /// Translate a single paragraph's text.
    ///
    /// One attempt, no retry. Failures surface as `Err` for the caller to
    /// branch on; callers keep the original text in that case, so a bad
    /// paragraph never aborts the document pass.
    pub async fn translate_text(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        match &self.provider {
            TranslationProviderImpl::Google { client } => {
                // Fixed pacing between calls keeps the free endpoint happy
                let delay = self.config.rate_limit_delay_ms;
                if delay > 0 {
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }

                let request = GoogleRequest::new(text, source_language, target_language);
                let response = client.complete(request).await?;
                Ok(GoogleTranslate::extract_text(&response))
            }
            TranslationProviderImpl::OpenAI { client } => {
                let system_prompt = format!(
                    "You are a professional translator. Translate the following text from {} to {}. \
                     Provide only the translation, no explanations or additional text.",
                    language_display_name(source_language),
                    language_display_name(target_language)
                );

                let request = OpenAIRequest::new(self.config.model.clone())
                    .add_message("system", system_prompt)
                    .add_message("user", text)
                    .temperature(self.config.temperature)
                    .max_tokens(self.config.max_tokens);

                let response = client.complete(request).await?;
                let translated = OpenAI::extract_text(&response);
                debug!(
                    "OpenAI translation returned {} characters for {} input characters",
                    translated.len(),
                    text.len()
                );
                Ok(translated)
            }
            TranslationProviderImpl::Mock { client } => {
                let request = MockRequest {
                    text: text.to_string(),
                    source_language: source_language.to_string(),
                    target_language: target_language.to_string(),
                };
                let response = client.complete(request).await?;
                Ok(MockProvider::extract_text(&response))
            }
        }
    }
}
