//! Router for the chat API

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};

use super::public;
use crate::api::public::ApiError;
use crate::api::state::AppState;

type SharedState = Arc<AppState>;

/// Send a prompt to the shared conversation and wait for the reply
async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<public::ChatRequest>,
) -> Result<Json<public::ChatResponse>, ApiError> {
    // Held for the whole request so prompts are answered one at a time
    let mut chat = state.chat.lock().await;

    let reply = match &payload.personality {
        Some(personality) => {
            chat.send_prompt_with_personality(&payload.message, personality)
                .await?
        }
        None => chat.send_prompt(&payload.message).await?,
    };

    Ok(Json(public::ChatResponse::new(&reply)))
}

/// Get the full conversation transcript
async fn history(State(state): State<SharedState>) -> Json<public::ChatTranscriptResponse> {
    let chat = state.chat.lock().await;
    Json(public::ChatTranscriptResponse {
        transcript: chat.transcript().to_vec(),
    })
}

/// Clear the conversation
async fn clear_history(State(state): State<SharedState>) -> StatusCode {
    state.chat.lock().await.clear_history();
    tracing::info!("Cleared chat history");
    StatusCode::NO_CONTENT
}

/// Replace the personality directive
async fn set_personality(
    State(state): State<SharedState>,
    Json(payload): Json<public::PersonalityRequest>,
) -> StatusCode {
    state
        .chat
        .lock()
        .await
        .set_personality(&payload.personality);
    StatusCode::NO_CONTENT
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", post(chat_handler))
        .route("/history", get(history).delete(clear_history))
        .route("/personality", put(set_personality))
}
