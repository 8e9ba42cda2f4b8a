use std::env;
use std::time::Duration;

use crate::ai::chat::HistoryWindow;

pub const DEFAULT_API_HOSTNAME: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_PERSONALITY: &str = "You are a helpful assistant.";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub api_hostname: String,
    pub model: String,
    pub default_personality: String,
    pub history_window: HistoryWindow,
    pub rollback_on_failure: bool,
    pub timeout: Option<Duration>,
}

impl AppConfig {
    /// Build a config from any key/value source. `Default` reads the
    /// process environment through this.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Treat set-but-empty variables the same as unset ones
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = var("GEMINI_API_KEY");
        let api_hostname =
            var("GEMINI_API_HOST").unwrap_or_else(|| DEFAULT_API_HOSTNAME.to_string());
        let model = var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let default_personality =
            var("GEMINI_PERSONALITY").unwrap_or_else(|| DEFAULT_PERSONALITY.to_string());

        let history_window = match var("GEMINI_HISTORY_MAX_TURNS") {
            Some(v) => match v.parse::<usize>() {
                Ok(n) => HistoryWindow::MaxTurns(n),
                Err(e) => {
                    tracing::warn!("Ignoring GEMINI_HISTORY_MAX_TURNS={}: {}", v, e);
                    HistoryWindow::Unbounded
                }
            },
            None => HistoryWindow::Unbounded,
        };

        let rollback_on_failure = var("GEMINI_ROLLBACK_ON_FAILURE")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let timeout = var("GEMINI_TIMEOUT_SECS").and_then(|v| match v.parse::<u64>() {
            Ok(secs) => Some(Duration::from_secs(secs)),
            Err(e) => {
                tracing::warn!("Ignoring GEMINI_TIMEOUT_SECS={}: {}", v, e);
                None
            }
        });

        Self {
            api_key,
            api_hostname,
            model,
            default_personality,
            history_window,
            rollback_on_failure,
            timeout,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }
}
