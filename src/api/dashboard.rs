use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::validation::validate_payload;
use crate::core::state::AppState;
use crate::db::types::ChatChannel;
use crate::repositories;
use crate::schemas::chat::ChatMessageResponse;
use crate::schemas::course::CourseInfoResponse;
use crate::schemas::dashboard::{AskRequest, AskResponse, DashboardResponse};
use crate::schemas::progress::ProgressResponse;
use crate::schemas::user::UserResponse;
use crate::services::course_catalog;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard)).route("/ask", post(ask))
}

async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<DashboardResponse>, ApiError> {
    let course_infos = repositories::course_infos::list_for_user(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;

    let window = i64::from(state.settings().ai().context_messages);
    let recent_messages = repositories::chat_messages::list_recent(
        state.db(),
        &user.id,
        Some(ChatChannel::CourseLookup),
        window,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to load chat history"))?;

    let progress = repositories::progress::list_for_user(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load progress"))?;

    Ok(Json(DashboardResponse {
        user: UserResponse::from_db(user),
        course_infos: course_infos.into_iter().map(CourseInfoResponse::from_db).collect(),
        recent_messages: recent_messages.into_iter().map(ChatMessageResponse::from_db).collect(),
        progress: progress.into_iter().map(ProgressResponse::from_db).collect(),
    }))
}

async fn ask(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    validate_payload(&payload)?;
    let question = payload.question.trim();
    if question.is_empty() {
        return Err(ApiError::BadRequest("question must not be empty".to_string()));
    }

    let discovery = course_catalog::discover(&state, &user.id, question).await?;

    Ok(Json(AskResponse {
        user_message: ChatMessageResponse::from_db(discovery.exchange.user_message),
        ai_message: ChatMessageResponse::from_db(discovery.exchange.ai_message),
        course_info: discovery.course_info.map(CourseInfoResponse::from_db),
    }))
}

#[cfg(test)]
mod tests;
