use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::validation::{chat_message, history_limit};
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::chat::{ChatHistoryQuery, ChatMessageResponse, ChatRequest, ChatResponse};
use crate::services::conversation;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(chat))
        .route("/history", get(history).delete(clear_history))
}

async fn chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = chat_message(&payload.message)?;
    let exchange = conversation::ask_tutor(&state, &user.id, message).await?;
    Ok(Json(ChatResponse { response: exchange.ai_message.text }))
}

async fn history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ChatHistoryQuery>,
) -> Result<Json<Vec<ChatMessageResponse>>, ApiError> {
    let messages = repositories::chat_messages::list_recent(
        state.db(),
        &user.id,
        query.channel,
        history_limit(query.limit),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to load chat history"))?;

    Ok(Json(messages.into_iter().map(ChatMessageResponse::from_db).collect()))
}

async fn clear_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ChatHistoryQuery>,
) -> Result<StatusCode, ApiError> {
    let deleted =
        repositories::chat_messages::delete_for_user(state.db(), &user.id, query.channel)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to clear chat history"))?;

    tracing::info!(user_id = %user.id, deleted, "Chat history cleared");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests;
