use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Client for the free Google web-translation endpoint
///
/// This is the same unauthenticated endpoint the usual "free translate"
/// libraries wrap: `translate_a/single` with `client=gtx`. It is stateless
/// per call and rate-limited server-side; callers pace their requests.
#[derive(Debug)]
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// Endpoint base URL (optional, defaults to the public endpoint)
    endpoint: String,
}

/// One translation request
#[derive(Debug, Clone)]
pub struct GoogleRequest {
    /// Text to translate
    pub text: String,
    /// Source language code or "auto"
    pub source_language: String,
    /// Target language code
    pub target_language: String,
}

impl GoogleRequest {
    /// Create a new request
    pub fn new(
        text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }
}

/// Parsed translation response
#[derive(Debug, Clone)]
pub struct GoogleResponse {
    /// The translated text
    pub text: String,
}

impl GoogleTranslate {
    /// Create a new client against the public endpoint
    pub fn new() -> Self {
        Self::with_endpoint("https://translate.googleapis.com")
    }

    /// Create a new client against a custom endpoint (tests, mirrors)
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
        }
    }

    /// Build the request URL for a translation call
    fn request_url(&self, request: &GoogleRequest) -> Result<Url, ProviderError> {
        let base = format!("{}/translate_a/single", self.endpoint.trim_end_matches('/'));
        Url::parse_with_params(
            &base,
            &[
                ("client", "gtx"),
                ("sl", request.source_language.as_str()),
                ("tl", request.target_language.as_str()),
                ("dt", "t"),
                ("q", request.text.as_str()),
            ],
        )
        .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint URL: {}", e)))
    }

    /// Parse the endpoint's array-of-arrays payload into the translated text.
    ///
    /// The first element is a list of segments; each segment's first element
    /// is a translated chunk. Chunks are concatenated in order.
    pub fn parse_translation(payload: &str) -> Result<String, ProviderError> {
        let value: Value = serde_json::from_str(payload)
            .map_err(|e| ProviderError::ParseError(format!("Invalid JSON payload: {}", e)))?;

        let segments = value
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::ParseError("Missing translation segments".to_string()))?;

        let mut translated = String::new();
        for segment in segments {
            if let Some(chunk) = segment.get(0).and_then(Value::as_str) {
                translated.push_str(chunk);
            }
        }

        if translated.is_empty() {
            return Err(ProviderError::ParseError(
                "Translation payload contained no text".to_string(),
            ));
        }

        Ok(translated)
    }
}

impl Default for GoogleTranslate {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for GoogleTranslate {
    type Request = GoogleRequest;
    type Response = GoogleResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let url = self.request_url(&request)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Google translation endpoint error ({}): {}", status, body);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: body,
            });
        }

        let payload = response
            .text()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to read response body: {}", e)))?;

        let text = Self::parse_translation(&payload)?;
        Ok(GoogleResponse { text })
    }

    fn extract_text(response: &Self::Response) -> String {
        response.text.clone()
    }
}
