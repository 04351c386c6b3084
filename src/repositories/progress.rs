use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::StudentProgress;

const COLUMNS: &str = "id, user_id, quiz_name, course_name, attempts, correct_answers, \
                       total_questions, last_score, updated_at";

pub(crate) struct RecordAttempt<'a> {
    pub(crate) user_id: &'a str,
    pub(crate) quiz_name: &'a str,
    pub(crate) course_name: &'a str,
    pub(crate) correct: i32,
    pub(crate) total: i32,
    pub(crate) score: f64,
    pub(crate) now: time::PrimitiveDateTime,
}

/// Adds one attempt to the running totals of a quiz, creating the row on first submission.
pub(crate) async fn record_attempt(
    pool: &PgPool,
    params: RecordAttempt<'_>,
) -> Result<StudentProgress, sqlx::Error> {
    sqlx::query_as::<_, StudentProgress>(&format!(
        "INSERT INTO student_progress (
            id, user_id, quiz_name, course_name, attempts, correct_answers, total_questions,
            last_score, updated_at
         ) VALUES ($1,$2,$3,$4,1,$5,$6,$7,$8)
         ON CONFLICT (user_id, quiz_name, course_name) DO UPDATE SET
            attempts = student_progress.attempts + 1,
            correct_answers = student_progress.correct_answers + EXCLUDED.correct_answers,
            total_questions = student_progress.total_questions + EXCLUDED.total_questions,
            last_score = EXCLUDED.last_score,
            updated_at = EXCLUDED.updated_at
         RETURNING {COLUMNS}",
    ))
    .bind(Uuid::new_v4().to_string())
    .bind(params.user_id)
    .bind(params.quiz_name)
    .bind(params.course_name)
    .bind(params.correct)
    .bind(params.total)
    .bind(params.score)
    .bind(params.now)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_for_user(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<StudentProgress>, sqlx::Error> {
    sqlx::query_as::<_, StudentProgress>(&format!(
        "SELECT {COLUMNS} FROM student_progress
         WHERE user_id = $1
         ORDER BY course_name, quiz_name",
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct StudentProgressRow {
    #[sqlx(flatten)]
    pub(crate) progress: StudentProgress,
    pub(crate) username: String,
}

pub(crate) async fn list_all_students(
    pool: &PgPool,
) -> Result<Vec<StudentProgressRow>, sqlx::Error> {
    sqlx::query_as::<_, StudentProgressRow>(
        "SELECT p.id, p.user_id, p.quiz_name, p.course_name, p.attempts, p.correct_answers,
                p.total_questions, p.last_score, p.updated_at, u.username
         FROM student_progress p
         JOIN users u ON u.id = p.user_id
         WHERE u.role = 'student'
         ORDER BY u.username, p.course_name, p.quiz_name",
    )
    .fetch_all(pool)
    .await
}
