use serde::Serialize;

use crate::core::time::format_primitive;
use crate::db::models::StudentProgress;
use crate::repositories::progress::StudentProgressRow;
use crate::services::grading::percentage;

#[derive(Debug, Serialize)]
pub(crate) struct ProgressResponse {
    pub(crate) quiz_name: String,
    pub(crate) course_name: String,
    pub(crate) attempts: i32,
    pub(crate) correct_answers: i32,
    pub(crate) total_questions: i32,
    pub(crate) last_score: f64,
    /// Share of all answers given so far that were correct.
    pub(crate) percentage: f64,
    pub(crate) updated_at: String,
}

impl ProgressResponse {
    pub(crate) fn from_db(progress: StudentProgress) -> Self {
        let percentage = percentage(
            progress.correct_answers.max(0) as usize,
            progress.total_questions.max(0) as usize,
        );
        Self {
            quiz_name: progress.quiz_name,
            course_name: progress.course_name,
            attempts: progress.attempts,
            correct_answers: progress.correct_answers,
            total_questions: progress.total_questions,
            last_score: progress.last_score,
            percentage,
            updated_at: format_primitive(progress.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentProgressResponse {
    pub(crate) user_id: String,
    pub(crate) username: String,
    #[serde(flatten)]
    pub(crate) progress: ProgressResponse,
}

impl StudentProgressResponse {
    pub(crate) fn from_row(row: StudentProgressRow) -> Self {
        Self {
            user_id: row.progress.user_id.clone(),
            username: row.username,
            progress: ProgressResponse::from_db(row.progress),
        }
    }
}
