use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::quizzes::{subtopic_target, topic_target};
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::note::{NoteCreate, NoteResponse};
use crate::services::notes;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", post(create_note)).route("/:note_id", get(get_note))
}

async fn create_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<NoteCreate>,
) -> Result<(StatusCode, Json<NoteResponse>), ApiError> {
    let target = match payload.subtopic_id.as_deref() {
        Some(subtopic_id) => subtopic_target(&state, &user.id, subtopic_id).await?,
        None => topic_target(&state, &user.id, &payload.topic_id).await?,
    };

    if target.topic_id != payload.topic_id || target.course_info_id != payload.course_id {
        return Err(ApiError::NotFound("Topic not found in this course".to_string()));
    }

    let (note, generated) = notes::ensure_note(&state, &target, payload.regenerate).await?;
    let status = if generated { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(NoteResponse::from_db(note))))
}

async fn get_note(
    Path(note_id): Path<String>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<NoteResponse>, ApiError> {
    let note = repositories::notes::find_for_user(state.db(), &user.id, &note_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch note"))?
        .ok_or_else(|| ApiError::NotFound("Note not found".to_string()))?;
    Ok(Json(NoteResponse::from_db(note)))
}
