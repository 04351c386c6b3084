use sqlx::PgPool;

use crate::db::models::Note;

const COLUMNS: &str =
    "id, course_id, topic_id, subtopic_id, title, markdown, html, created_at, updated_at";

pub(crate) struct SaveNote<'a> {
    pub(crate) id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) topic_id: &'a str,
    pub(crate) subtopic_id: Option<&'a str>,
    pub(crate) title: &'a str,
    pub(crate) markdown: &'a str,
    pub(crate) html: &'a str,
    pub(crate) now: time::PrimitiveDateTime,
}

pub(crate) async fn find_for_target(
    pool: &PgPool,
    topic_id: &str,
    subtopic_id: Option<&str>,
) -> Result<Option<Note>, sqlx::Error> {
    sqlx::query_as::<_, Note>(&format!(
        "SELECT {COLUMNS} FROM notes
         WHERE topic_id = $1 AND subtopic_id IS NOT DISTINCT FROM $2",
    ))
    .bind(topic_id)
    .bind(subtopic_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn find_for_user(
    pool: &PgPool,
    user_id: &str,
    note_id: &str,
) -> Result<Option<Note>, sqlx::Error> {
    sqlx::query_as::<_, Note>(
        "SELECT n.id, n.course_id, n.topic_id, n.subtopic_id, n.title, n.markdown, n.html,
                n.created_at, n.updated_at
         FROM notes n
         JOIN courses c ON c.id = n.course_id
         WHERE n.id = $1 AND c.user_id = $2",
    )
    .bind(note_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_for_course(pool: &PgPool, course_id: &str) -> Result<Vec<Note>, sqlx::Error> {
    sqlx::query_as::<_, Note>(&format!(
        "SELECT {COLUMNS} FROM notes WHERE course_id = $1 ORDER BY created_at, title",
    ))
    .bind(course_id)
    .fetch_all(pool)
    .await
}

/// Replaces the note stored for the same topic/subtopic, keeping one note per target.
pub(crate) async fn replace_for_target(
    pool: &PgPool,
    params: SaveNote<'_>,
) -> Result<Note, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM notes WHERE topic_id = $1 AND subtopic_id IS NOT DISTINCT FROM $2")
        .bind(params.topic_id)
        .bind(params.subtopic_id)
        .execute(&mut *tx)
        .await?;

    let note = sqlx::query_as::<_, Note>(&format!(
        "INSERT INTO notes (
            id, course_id, topic_id, subtopic_id, title, markdown, html, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$8)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.course_id)
    .bind(params.topic_id)
    .bind(params.subtopic_id)
    .bind(params.title)
    .bind(params.markdown)
    .bind(params.html)
    .bind(params.now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(note)
}
