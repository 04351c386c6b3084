use uuid::Uuid;

use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::ChatMessage;
use crate::db::types::{ChatChannel, ChatSender};
use crate::repositories::chat_messages::{self, CreateMessage};
use crate::services::llm::{build_context_prompt, GenerationError, GenerationRequest};
use crate::services::personas::Persona;

/// A stored question and the model's reply to it.
#[derive(Debug, Clone)]
pub(crate) struct Exchange {
    pub(crate) user_message: ChatMessage,
    pub(crate) ai_message: ChatMessage,
}

/// Sends `message` with the latest messages of the channel as context, then stores both
/// sides of the exchange. Nothing is stored when the AI call fails.
pub(crate) async fn converse(
    state: &AppState,
    user_id: &str,
    channel: ChatChannel,
    persona: Persona,
    message: &str,
) -> Result<Exchange, GenerationError> {
    let window = i64::from(state.settings().ai().context_messages);
    let history = chat_messages::list_recent(state.db(), user_id, Some(channel), window).await?;
    let prompt = build_context_prompt(&history, message);

    let asked_at = primitive_now_utc();
    let reply = state
        .generator()
        .generate(GenerationRequest::new(persona, prompt))
        .await
        .map_err(GenerationError::Upstream)?;
    let answered_at = primitive_now_utc();

    let mut tx = state.db().begin().await?;
    let user_message = chat_messages::create(
        &mut *tx,
        CreateMessage {
            id: &Uuid::new_v4().to_string(),
            user_id,
            course_info_id: None,
            channel,
            sender: ChatSender::User,
            text: message,
            created_at: asked_at,
        },
    )
    .await?;
    let ai_message = chat_messages::create(
        &mut *tx,
        CreateMessage {
            id: &Uuid::new_v4().to_string(),
            user_id,
            course_info_id: None,
            channel,
            sender: ChatSender::Ai,
            text: reply.trim(),
            created_at: answered_at,
        },
    )
    .await?;
    tx.commit().await?;

    Ok(Exchange { user_message, ai_message })
}

/// Free-form study help.
pub(crate) async fn ask_tutor(
    state: &AppState,
    user_id: &str,
    message: &str,
) -> Result<Exchange, GenerationError> {
    converse(state, user_id, ChatChannel::Tutor, Persona::Tutor, message).await
}
