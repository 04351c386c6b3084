use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::QuizQuestion;

const COLUMNS: &str =
    "id, topic_id, subtopic_id, question, options, correct_option, position, created_at";

pub(crate) struct NewQuestion<'a> {
    pub(crate) question: &'a str,
    pub(crate) options: &'a [String],
    pub(crate) correct_option: char,
}

/// Topic quizzes are the rows without a subtopic; subtopic quizzes are keyed by subtopic.
pub(crate) async fn list_for_target(
    pool: &PgPool,
    topic_id: &str,
    subtopic_id: Option<&str>,
) -> Result<Vec<QuizQuestion>, sqlx::Error> {
    sqlx::query_as::<_, QuizQuestion>(&format!(
        "SELECT {COLUMNS}
         FROM quiz_questions
         WHERE topic_id = $1 AND subtopic_id IS NOT DISTINCT FROM $2
         ORDER BY position",
    ))
    .bind(topic_id)
    .bind(subtopic_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn replace_for_target(
    pool: &PgPool,
    topic_id: &str,
    subtopic_id: Option<&str>,
    questions: &[NewQuestion<'_>],
    now: time::PrimitiveDateTime,
) -> Result<Vec<QuizQuestion>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM quiz_questions WHERE topic_id = $1 AND subtopic_id IS NOT DISTINCT FROM $2")
        .bind(topic_id)
        .bind(subtopic_id)
        .execute(&mut *tx)
        .await?;

    let mut stored = Vec::with_capacity(questions.len());
    for (position, question) in questions.iter().enumerate() {
        let row = sqlx::query_as::<_, QuizQuestion>(&format!(
            "INSERT INTO quiz_questions (
                id, topic_id, subtopic_id, question, options, correct_option, position, created_at
             ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
             RETURNING {COLUMNS}",
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(topic_id)
        .bind(subtopic_id)
        .bind(question.question)
        .bind(Json(question.options))
        .bind(question.correct_option.to_string())
        .bind(position as i32)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
        stored.push(row);
    }

    tx.commit().await?;
    Ok(stored)
}

/// A question together with the names needed to explain it, scoped to its owner.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct QuestionWithContext {
    #[sqlx(flatten)]
    pub(crate) question: QuizQuestion,
    pub(crate) course_name: String,
    pub(crate) topic_name: String,
}

pub(crate) async fn find_for_user(
    pool: &PgPool,
    user_id: &str,
    question_id: &str,
) -> Result<Option<QuestionWithContext>, sqlx::Error> {
    sqlx::query_as::<_, QuestionWithContext>(
        "SELECT q.id, q.topic_id, q.subtopic_id, q.question, q.options, q.correct_option,
                q.position, q.created_at, c.course_name, t.name AS topic_name
         FROM quiz_questions q
         JOIN topics t ON t.id = q.topic_id
         JOIN courses c ON c.id = t.course_id
         WHERE q.id = $1 AND c.user_id = $2",
    )
    .bind(question_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
