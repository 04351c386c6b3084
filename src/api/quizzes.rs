use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::repositories::{self, outlines::StudyTarget};
use crate::schemas::progress::ProgressResponse;
use crate::schemas::quiz::{ExplanationResponse, QuizResponse, QuizResultResponse, QuizSubmission};
use crate::services::{explanations, grading, quiz_generation};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/topics/:topic_id/quiz", post(generate_topic_quiz).get(take_topic_quiz))
        .route("/topics/:topic_id/quiz/submit", post(submit_topic_quiz))
        .route("/subtopics/:subtopic_id/quiz", post(generate_subtopic_quiz).get(take_subtopic_quiz))
        .route("/subtopics/:subtopic_id/quiz/submit", post(submit_subtopic_quiz))
        .route("/quiz-questions/:question_id/explanation", post(explain_question))
}

pub(crate) async fn topic_target(
    state: &AppState,
    user_id: &str,
    topic_id: &str,
) -> Result<StudyTarget, ApiError> {
    repositories::outlines::find_topic_target(state.db(), user_id, topic_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch topic"))?
        .ok_or_else(|| ApiError::NotFound("Topic not found".to_string()))
}

pub(crate) async fn subtopic_target(
    state: &AppState,
    user_id: &str,
    subtopic_id: &str,
) -> Result<StudyTarget, ApiError> {
    repositories::outlines::find_subtopic_target(state.db(), user_id, subtopic_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch subtopic"))?
        .ok_or_else(|| ApiError::NotFound("Subtopic not found".to_string()))
}

async fn generate(
    state: &AppState,
    target: StudyTarget,
) -> Result<(StatusCode, Json<QuizResponse>), ApiError> {
    let questions = quiz_generation::generate_quiz(state, &target).await?;
    Ok((StatusCode::CREATED, Json(QuizResponse::new(&target, questions))))
}

async fn take(state: &AppState, target: StudyTarget) -> Result<Json<QuizResponse>, ApiError> {
    let questions = repositories::quiz_questions::list_for_target(
        state.db(),
        &target.topic_id,
        target.subtopic_id.as_deref(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to load quiz"))?;

    if questions.is_empty() {
        return Err(ApiError::NotFound("No quiz has been generated yet".to_string()));
    }
    Ok(Json(QuizResponse::new(&target, questions)))
}

async fn submit(
    state: &AppState,
    user_id: &str,
    target: StudyTarget,
    submission: QuizSubmission,
) -> Result<Json<QuizResultResponse>, ApiError> {
    let questions = repositories::quiz_questions::list_for_target(
        state.db(),
        &target.topic_id,
        target.subtopic_id.as_deref(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to load quiz"))?;

    if questions.is_empty() {
        return Err(ApiError::NotFound("No quiz has been generated yet".to_string()));
    }

    let (grade, progress) =
        grading::submit(state.db(), user_id, &target, &questions, &submission.answers)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to record quiz progress"))?;

    Ok(Json(QuizResultResponse::new(
        target.quiz_name(),
        grade,
        ProgressResponse::from_db(progress),
    )))
}

async fn generate_topic_quiz(
    Path(topic_id): Path<String>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<(StatusCode, Json<QuizResponse>), ApiError> {
    let target = topic_target(&state, &user.id, &topic_id).await?;
    generate(&state, target).await
}

async fn generate_subtopic_quiz(
    Path(subtopic_id): Path<String>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<(StatusCode, Json<QuizResponse>), ApiError> {
    let target = subtopic_target(&state, &user.id, &subtopic_id).await?;
    generate(&state, target).await
}

async fn take_topic_quiz(
    Path(topic_id): Path<String>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<QuizResponse>, ApiError> {
    let target = topic_target(&state, &user.id, &topic_id).await?;
    take(&state, target).await
}

async fn take_subtopic_quiz(
    Path(subtopic_id): Path<String>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<QuizResponse>, ApiError> {
    let target = subtopic_target(&state, &user.id, &subtopic_id).await?;
    take(&state, target).await
}

async fn submit_topic_quiz(
    Path(topic_id): Path<String>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(submission): Json<QuizSubmission>,
) -> Result<Json<QuizResultResponse>, ApiError> {
    let target = topic_target(&state, &user.id, &topic_id).await?;
    submit(&state, &user.id, target, submission).await
}

async fn submit_subtopic_quiz(
    Path(subtopic_id): Path<String>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(submission): Json<QuizSubmission>,
) -> Result<Json<QuizResultResponse>, ApiError> {
    let target = subtopic_target(&state, &user.id, &subtopic_id).await?;
    submit(&state, &user.id, target, submission).await
}

async fn explain_question(
    Path(question_id): Path<String>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ExplanationResponse>, ApiError> {
    let context = repositories::quiz_questions::find_for_user(state.db(), &user.id, &question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz question"))?
        .ok_or_else(|| ApiError::NotFound("Quiz question not found".to_string()))?;

    let explanation = explanations::explain(&state, &context).await?;
    Ok(Json(ExplanationResponse { question_id: context.question.id, explanation }))
}
