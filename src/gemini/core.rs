use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::ChatError;

pub const API_VERSION: &str = "v1beta";

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "model")]
    Model,
    #[serde(rename = "user")]
    User,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
        }
    }
}

// Object {
//     "parts": Array [ Object { "text": String("Hello") } ],
//     "role": String("user")
// }
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl Content {
    pub fn new(role: Role, text: &str) -> Self {
        Self {
            parts: vec![Part::text(text)],
            role: Some(role),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct GenerateContentRequest<'a> {
    pub contents: &'a [Content],
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub avg_logprobs: Option<f64>,
}

#[derive(Deserialize, Debug)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// The text of the first part of the first candidate. Any other
    /// candidates or parts are ignored.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

pub fn generate_content_url(api_hostname: &str, model: &str) -> String {
    format!(
        "{}/{}/models/{}:generateContent",
        api_hostname.trim_end_matches('/'),
        API_VERSION,
        model
    )
}

/// Sends a single `generateContent` request. There is no retry. A
/// non-2xx status is returned as a `TransportError` carrying the
/// response body.
pub async fn generate_content(
    contents: &[Content],
    api_hostname: &str,
    api_key: &str,
    model: &str,
    timeout: Option<Duration>,
) -> Result<GenerateContentResponse, ChatError> {
    let url = generate_content_url(api_hostname, model);
    let payload = GenerateContentRequest { contents };

    tracing::debug!("POST {} with {} contents", url, contents.len());

    let mut request = reqwest::Client::new()
        .post(url)
        .query(&[("key", api_key)])
        .header("Content-Type", "application/json")
        .json(&payload);
    if let Some(timeout) = timeout {
        request = request.timeout(timeout);
    }

    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ChatError::TransportError {
            status: Some(status.as_u16()),
            body,
        });
    }

    serde_json::from_str(&body)
        .map_err(|e| ChatError::MalformedResponse(format!("{}. Body:\n\n {}", e, body)))
}
