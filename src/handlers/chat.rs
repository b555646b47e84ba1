// src/handlers/chat.rs

use axum::{Json, extract::State, response::IntoResponse};
use validator::Validate;

use crate::{
    error::AppError,
    generation::prompt::build_hint_prompt,
    models::chat::{ChatReply, ChatRequest},
    state::AppState,
};

/// Asks the model for a hint on the current question without giving the answer away.
pub async fn chat_support(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    let llm = state.llm()?;
    payload.validate()?;

    let prompt = build_hint_prompt(&payload.question_text, &payload.user_query, &payload.topic);
    let reply = llm.generate_text(&prompt).await.map_err(|e| {
        tracing::error!("Chat support failed: {}", e);
        AppError::Upstream(e.to_string())
    })?;

    Ok(Json(ChatReply { reply }))
}
