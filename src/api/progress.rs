use axum::{extract::State, routing::get, Json, Router};

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentTeacher, CurrentUser};
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::progress::{ProgressResponse, StudentProgressResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(my_progress)).route("/students", get(students_progress))
}

async fn my_progress(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ProgressResponse>>, ApiError> {
    let rows = repositories::progress::list_for_user(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load progress"))?;
    Ok(Json(rows.into_iter().map(ProgressResponse::from_db).collect()))
}

async fn students_progress(
    State(state): State<AppState>,
    CurrentTeacher(_teacher): CurrentTeacher,
) -> Result<Json<Vec<StudentProgressResponse>>, ApiError> {
    let rows = repositories::progress::list_all_students(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load student progress"))?;
    Ok(Json(rows.into_iter().map(StudentProgressResponse::from_row).collect()))
}
