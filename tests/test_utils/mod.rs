//! Test utilities for integration tests
use std::sync::Arc;

use axum::{Router, body::Body};

use gemini_chat::ai::chat::HistoryWindow;
use gemini_chat::api::AppState;
use gemini_chat::api::app;
use gemini_chat::core::AppConfig;

pub const TEST_MODEL: &str = "gemini-test";
pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_PERSONALITY: &str = "You are a helpful assistant.";

/// Config pointing at a mock Gemini server.
pub fn test_config(api_hostname: &str, api_key: Option<&str>) -> AppConfig {
    AppConfig {
        api_key: api_key.map(String::from),
        api_hostname: api_hostname.to_string(),
        model: String::from(TEST_MODEL),
        default_personality: String::from(TEST_PERSONALITY),
        history_window: HistoryWindow::Unbounded,
        rollback_on_failure: false,
        timeout: None,
    }
}

/// Creates a test application router backed by `config`.
pub fn test_app(config: AppConfig) -> Router {
    let app_state = AppState::new(config);
    app(Arc::new(app_state))
}

/// Path of the generateContent endpoint for the test model.
pub fn generate_content_path() -> String {
    format!("/v1beta/models/{}:generateContent", TEST_MODEL)
}

/// A successful Gemini response with a single candidate.
pub fn gemini_reply(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }], "role": "model" },
            "finishReason": "STOP",
            "avgLogprobs": -0.3
        }]
    })
    .to_string()
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not utf-8")
}
