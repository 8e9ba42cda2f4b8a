use thiserror::Error;

/// Everything that can go wrong when sending a prompt.
///
/// The variants let callers tell a misconfigured credential apart
/// from a provider failure. Callers that only care about success can
/// call `.ok()` on the result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    /// No API key was configured. Nothing was sent and the transcript
    /// was not touched.
    #[error("missing Gemini API key")]
    MissingCredential,

    /// The request never completed or the provider answered with a
    /// non-2xx status. `status` is `None` for connection level errors.
    #[error("transport error (status {status:?}): {body}")]
    TransportError { status: Option<u16>, body: String },

    /// The provider answered but the body did not contain
    /// `candidates[0].content.parts[0].text`.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ChatError {
    /// Short machine readable name for the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::TransportError { .. } => "transport_error",
            Self::MalformedResponse(_) => "malformed_response",
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key as a query parameter so
        // it must never end up in the message
        let err = err.without_url();
        Self::TransportError {
            status: err.status().map(|s| s.as_u16()),
            body: err.to_string(),
        }
    }
}
