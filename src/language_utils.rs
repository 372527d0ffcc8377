/// Language display-name utilities
///
/// Translation backends take ISO-style codes directly, but the chat-based
/// provider phrases its instruction with full language names. The mapping is
/// a fixed table; codes not in the table pass through verbatim so the model
/// still gets something usable ("translate to nah" reads fine either way).
/// Display name for a language code, used when phrasing LLM prompts
pub fn language_display_name(code: &str) -> String {
    let normalized = code.trim().to_lowercase();
    match normalized.as_str() {
        "en" => "English".to_string(),
        "es" => "Spanish".to_string(),
        "fr" => "French".to_string(),
        "de" => "German".to_string(),
        "it" => "Italian".to_string(),
        "pt" => "Portuguese".to_string(),
        "ru" => "Russian".to_string(),
        "zh" => "Chinese".to_string(),
        "ja" => "Japanese".to_string(),
        "ko" => "Korean".to_string(),
        "ar" => "Arabic".to_string(),
        "hi" => "Hindi".to_string(),
        "auto" => "auto-detected language".to_string(),
        _ => code.trim().to_string(),
    }
}

/// Check whether a source-language code means "let the backend detect it"
pub fn is_auto(code: &str) -> bool {
    code.trim().eq_ignore_ascii_case("auto")
}
