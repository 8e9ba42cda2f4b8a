use std::fmt;
use std::time::Duration;

use crate::core::{AppConfig, ChatError};
use crate::gemini::{Content, Role, generate_content};

use super::models::{HistoryWindow, Transcript, Turn};

/// A single conversation with Gemini.
///
/// Every call resends the transcript (or the configured window of
/// it) and records the prompt and the reply. `send_prompt` takes
/// `&mut self` so calls on one `Chat` can never interleave. Wrap it
/// in a `tokio::sync::Mutex` to share it between tasks.
///
/// Use `Chat::builder()` to construct a valid `Chat`.
pub struct Chat {
    api_hostname: String,
    api_key: Option<String>,
    model: String,
    default_personality: String,
    history_window: HistoryWindow,
    rollback_on_failure: bool,
    timeout: Option<Duration>,
    transcript: Transcript,
}

// The API key is redacted so it never shows up in logs
impl fmt::Debug for Chat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chat")
            .field("api_hostname", &self.api_hostname)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("default_personality", &self.default_personality)
            .field("history_window", &self.history_window)
            .field("rollback_on_failure", &self.rollback_on_failure)
            .field("timeout", &self.timeout)
            .field("transcript", &self.transcript)
            .finish()
    }
}

impl Chat {
    pub fn builder(api_hostname: &str, model: &str) -> ChatBuilder {
        ChatBuilder::new(api_hostname, model)
    }

    /// Sends `prompt` using the configured default personality.
    pub async fn send_prompt(&mut self, prompt: &str) -> Result<String, ChatError> {
        self.next_msg(prompt, None).await
    }

    /// Sends `prompt`. `personality` is only used when the transcript
    /// is empty and gets seeded by this call.
    pub async fn send_prompt_with_personality(
        &mut self,
        prompt: &str,
        personality: &str,
    ) -> Result<String, ChatError> {
        self.next_msg(prompt, Some(personality)).await
    }

    pub fn clear_history(&mut self) {
        self.transcript.clear();
    }

    pub fn set_personality(&mut self, text: &str) {
        self.transcript.set_personality(text);
    }

    pub fn transcript(&self) -> &[Turn] {
        self.transcript.snapshot()
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn next_msg(
        &mut self,
        prompt: &str,
        personality: Option<&str>,
    ) -> Result<String, ChatError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::error!("Gemini API key is not set, skipping request");
            return Err(ChatError::MissingCredential);
        };

        let personality = personality
            .or(self.transcript.pending_personality())
            .unwrap_or(self.default_personality.as_str())
            .to_string();
        let seeded = self.transcript.seed(&personality);
        self.transcript.append(Role::User, prompt);

        let contents: Vec<Content> = self
            .transcript
            .window(self.history_window)
            .into_iter()
            .map(Content::from)
            .collect();

        let result = generate_content(
            &contents,
            &self.api_hostname,
            api_key,
            &self.model,
            self.timeout,
        )
        .await
        .and_then(|resp| {
            resp.first_text().map(str::to_string).ok_or_else(|| {
                ChatError::MalformedResponse(format!(
                    "No candidate text in response: {:?}",
                    resp
                ))
            })
        });

        match result {
            Ok(text) => {
                self.transcript.append(Role::Model, &text);
                Ok(text)
            }
            Err(err) => {
                match &err {
                    ChatError::TransportError { status, body } => {
                        tracing::error!(
                            "Gemini request failed. Status: {:?}. Body:\n\n {}",
                            status,
                            body
                        )
                    }
                    other => tracing::error!("Gemini request failed: {}", other),
                }
                if self.rollback_on_failure {
                    self.transcript.pop();
                    if seeded {
                        self.transcript.pop();
                    }
                }
                Err(err)
            }
        }
    }
}

#[derive(Default)]
pub struct ChatBuilder {
    api_hostname: String,
    api_key: Option<String>,
    model: String,
    default_personality: String,
    history_window: HistoryWindow,
    rollback_on_failure: bool,
    timeout: Option<Duration>,
    transcript: Transcript,
}

impl ChatBuilder {
    pub fn new(api_hostname: &str, model: &str) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            model: model.to_string(),
            default_personality: crate::core::config::DEFAULT_PERSONALITY.to_string(),
            ..Default::default()
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let builder = Self::new(&config.api_hostname, &config.model)
            .personality(&config.default_personality)
            .history_window(config.history_window)
            .rollback_on_failure(config.rollback_on_failure);
        let builder = match &config.api_key {
            Some(key) => builder.api_key(key),
            None => builder,
        };
        match config.timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }

    pub fn build(self) -> Chat {
        Chat {
            api_hostname: self.api_hostname,
            api_key: self.api_key,
            model: self.model,
            default_personality: self.default_personality,
            history_window: self.history_window,
            rollback_on_failure: self.rollback_on_failure,
            timeout: self.timeout,
            transcript: self.transcript,
        }
    }

    pub fn api_key(mut self, api_key: &str) -> Self {
        // An empty key is the same as no key
        if api_key.trim().is_empty() {
            self.api_key = None;
        } else {
            self.api_key = Some(api_key.to_string());
        }
        self
    }

    pub fn personality(mut self, personality: &str) -> Self {
        self.default_personality = personality.to_string();
        self
    }

    pub fn history_window(mut self, window: HistoryWindow) -> Self {
        self.history_window = window;
        self
    }

    pub fn rollback_on_failure(mut self, rollback: bool) -> Self {
        self.rollback_on_failure = rollback;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn transcript(mut self, turns: Vec<Turn>) -> Self {
        self.transcript = Transcript::new_with_turns(turns);
        self
    }
}
