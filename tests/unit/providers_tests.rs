/*!
 * Tests for provider implementations
 */

use serde_json::json;

use decktrans::errors::ProviderError;
use decktrans::providers::google::GoogleTranslate;
use decktrans::providers::mock::{MockProvider, MockRequest};
use decktrans::providers::openai::{OpenAIRequest, OpenAIResponse};
use decktrans::providers::Provider;

fn mock_request(text: &str) -> MockRequest {
    MockRequest {
        text: text.to_string(),
        source_language: "auto".to_string(),
        target_language: "es".to_string(),
    }
}

/// Test parsing of the web endpoint's array-of-arrays payload
#[test]
fn test_google_parse_translation_withSingleSegment_shouldExtractText() {
    let payload = r#"[[["Hola mundo","Hello world",null,null,1]],null,"en"]"#;
    let translated = GoogleTranslate::parse_translation(payload).unwrap();
    assert_eq!(translated, "Hola mundo");
}

/// Test that multi-segment payloads are concatenated in order
#[test]
fn test_google_parse_translation_withMultipleSegments_shouldConcatenate() {
    let payload = r#"[[["Primera frase. ","First sentence. "],["Segunda frase.","Second sentence."]],null,"en"]"#;
    let translated = GoogleTranslate::parse_translation(payload).unwrap();
    assert_eq!(translated, "Primera frase. Segunda frase.");
}

/// Test that malformed payloads surface as parse errors
#[test]
fn test_google_parse_translation_withMalformedPayload_shouldFail() {
    assert!(matches!(
        GoogleTranslate::parse_translation("not json"),
        Err(ProviderError::ParseError(_))
    ));
    assert!(matches!(
        GoogleTranslate::parse_translation("{}"),
        Err(ProviderError::ParseError(_))
    ));
    // Structurally valid but empty payloads are also an error: the provider
    // must never hand an empty translation to the caller as a success
    assert!(matches!(
        GoogleTranslate::parse_translation("[[],null,\"en\"]"),
        Err(ProviderError::ParseError(_))
    ));
}

/// Test the chat-completions request serialization
#[test]
fn test_openai_request_withBuilderChain_shouldSerializeAllFields() {
    let request = OpenAIRequest::new("gpt-3.5-turbo")
        .add_message("system", "You are a professional translator.")
        .add_message("user", "Hello world")
        .temperature(0.3)
        .max_tokens(1024);

    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["model"], json!("gpt-3.5-turbo"));
    assert_eq!(value["temperature"], json!(0.3));
    assert_eq!(value["max_tokens"], json!(1024));
    assert_eq!(value["messages"][0]["role"], json!("system"));
    assert_eq!(value["messages"][1]["content"], json!("Hello world"));
}

/// Test completion extraction trims the choice content
#[test]
fn test_openai_extract_text_withPaddedCompletion_shouldTrim() {
    let response: OpenAIResponse = serde_json::from_str(
        r#"{ "choices": [ { "message": { "role": "assistant", "content": "  Hola mundo \n" } } ] }"#,
    )
    .unwrap();

    assert_eq!(
        <decktrans::providers::openai::OpenAI as Provider>::extract_text(&response),
        "Hola mundo"
    );
}

/// Test completion extraction on an empty choice list
#[test]
fn test_openai_extract_text_withNoChoices_shouldReturnEmpty() {
    let response: OpenAIResponse = serde_json::from_str(r#"{ "choices": [] }"#).unwrap();

    assert_eq!(
        <decktrans::providers::openai::OpenAI as Provider>::extract_text(&response),
        ""
    );
}

/// Test the working mock echoes through its generator
#[tokio::test]
async fn test_mock_provider_withWorkingBehavior_shouldTranslate() {
    let mock = MockProvider::working()
        .with_custom_response(|request| format!("translated:{}", request.text));

    let response = mock.complete(mock_request("Hello")).await.unwrap();

    assert_eq!(response.text, "translated:Hello");
    assert_eq!(mock.request_count(), 1);
}

/// Test the failing mock surfaces an error and still counts the call
#[tokio::test]
async fn test_mock_provider_withFailingBehavior_shouldError() {
    let mock = MockProvider::failing();

    let result = mock.complete(mock_request("Hello")).await;

    assert!(matches!(result, Err(ProviderError::RequestFailed(_))));
    assert_eq!(mock.request_count(), 1);
}

/// Test the empty mock returns a blank completion
#[tokio::test]
async fn test_mock_provider_withEmptyBehavior_shouldReturnBlank() {
    let mock = MockProvider::empty();

    let response = mock.complete(mock_request("Hello")).await.unwrap();

    assert_eq!(response.text, "");
}
