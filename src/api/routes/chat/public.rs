//! Public types for the chat API
use serde::{Deserialize, Serialize};

use crate::ai::chat::Turn;

#[derive(Deserialize, Serialize)]
pub struct ChatRequest {
    pub message: String,
    // Only used when the conversation is empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
}

impl ChatResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct ChatTranscriptResponse {
    pub transcript: Vec<Turn>,
}

#[derive(Deserialize, Serialize)]
pub struct PersonalityRequest {
    pub personality: String,
}
