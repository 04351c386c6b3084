use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::validation::validate_payload;
use crate::core::state::AppState;
use crate::db::models::CourseInfo;
use crate::repositories;
use crate::schemas::course::{
    CourseDetailResponse, CourseInfoCreate, CourseInfoResponse, CourseOutlineResponse,
    OutlineRequest, OutlineResponse,
};
use crate::schemas::note::NoteSummaryResponse;
use crate::services::course_catalog::{self, CourseDetails};
use crate::services::outline;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/:course_id", get(get_course).delete(delete_course))
        .route("/:course_id/outline", post(generate_outline))
        .route("/:course_id/notes", get(list_course_notes))
}

pub(crate) async fn fetch_course_info(
    state: &AppState,
    user_id: &str,
    course_id: &str,
) -> Result<CourseInfo, ApiError> {
    repositories::course_infos::find_for_user(state.db(), user_id, course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))
}

async fn list_courses(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<CourseInfoResponse>>, ApiError> {
    let courses = repositories::course_infos::list_for_user(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;
    Ok(Json(courses.into_iter().map(CourseInfoResponse::from_db).collect()))
}

async fn create_course(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CourseInfoCreate>,
) -> Result<(StatusCode, Json<CourseInfoResponse>), ApiError> {
    validate_payload(&payload)?;
    let details =
        CourseDetails::new(&payload.course_code, &payload.course_name, &payload.description)
            .ok_or_else(|| {
                ApiError::UnprocessableEntity(
                    "course_code and course_name must not be blank".to_string(),
                )
            })?;

    let (info, created) = course_catalog::reconcile(state.db(), &user.id, &details)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to save course"))?;

    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(CourseInfoResponse::from_db(info))))
}

async fn get_course(
    Path(course_id): Path<String>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<CourseDetailResponse>, ApiError> {
    let info = fetch_course_info(&state, &user.id, &course_id).await?;
    let outline = outline::load_outline(state.db(), &info.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load course outline"))?;

    Ok(Json(CourseDetailResponse {
        info: CourseInfoResponse::from_db(info),
        outline: outline.map(CourseOutlineResponse::from_outline),
    }))
}

async fn delete_course(
    Path(course_id): Path<String>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode, ApiError> {
    let deleted = repositories::course_infos::delete_for_user(state.db(), &user.id, &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete course"))?;

    if !deleted {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    tracing::info!(user_id = %user.id, course_id = %course_id, "Course deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn generate_outline(
    Path(course_id): Path<String>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Option<Json<OutlineRequest>>,
) -> Result<(StatusCode, Json<OutlineResponse>), ApiError> {
    let Json(payload) = payload.unwrap_or_default();
    let info = fetch_course_info(&state, &user.id, &course_id).await?;

    let (course_outline, generated) =
        outline::ensure_outline(&state, &info, payload.regenerate).await?;

    let status = if generated { StatusCode::CREATED } else { StatusCode::OK };
    Ok((
        status,
        Json(OutlineResponse {
            generated,
            outline: CourseOutlineResponse::from_outline(course_outline),
        }),
    ))
}

async fn list_course_notes(
    Path(course_id): Path<String>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<NoteSummaryResponse>>, ApiError> {
    let info = fetch_course_info(&state, &user.id, &course_id).await?;
    let Some(course) = repositories::outlines::find_course_by_info(state.db(), &info.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course outline"))?
    else {
        return Ok(Json(Vec::new()));
    };

    let notes = repositories::notes::list_for_course(state.db(), &course.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list notes"))?;
    Ok(Json(notes.into_iter().map(NoteSummaryResponse::from_db).collect()))
}
