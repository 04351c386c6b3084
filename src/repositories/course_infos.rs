use sqlx::{FromRow, PgPool, Row};

use crate::db::models::CourseInfo;

const COLUMNS: &str = "id, user_id, course_code, course_name, description, created_at, updated_at";

pub(crate) struct UpsertCourseInfo<'a> {
    pub(crate) id: &'a str,
    pub(crate) user_id: &'a str,
    pub(crate) course_code: &'a str,
    pub(crate) course_name: &'a str,
    pub(crate) description: &'a str,
    pub(crate) now: time::PrimitiveDateTime,
}

/// Inserts the course or refreshes the existing row with the same code.
/// Returns the row and whether it was newly created.
pub(crate) async fn upsert(
    executor: impl sqlx::PgExecutor<'_>,
    params: UpsertCourseInfo<'_>,
) -> Result<(CourseInfo, bool), sqlx::Error> {
    let row = sqlx::query(&format!(
        "INSERT INTO course_infos (
            id, user_id, course_code, course_name, description, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$6)
         ON CONFLICT (user_id, course_code) DO UPDATE SET
            course_name = EXCLUDED.course_name,
            description = CASE
                WHEN EXCLUDED.description = '' THEN course_infos.description
                ELSE EXCLUDED.description
            END,
            updated_at = EXCLUDED.updated_at
         RETURNING {COLUMNS}, (xmax = 0) AS inserted",
    ))
    .bind(params.id)
    .bind(params.user_id)
    .bind(params.course_code)
    .bind(params.course_name)
    .bind(params.description)
    .bind(params.now)
    .fetch_one(executor)
    .await?;

    let inserted: bool = row.try_get("inserted")?;
    Ok((CourseInfo::from_row(&row)?, inserted))
}

pub(crate) async fn find_for_user(
    pool: &PgPool,
    user_id: &str,
    id: &str,
) -> Result<Option<CourseInfo>, sqlx::Error> {
    sqlx::query_as::<_, CourseInfo>(&format!(
        "SELECT {COLUMNS} FROM course_infos WHERE id = $1 AND user_id = $2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_for_user(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<CourseInfo>, sqlx::Error> {
    sqlx::query_as::<_, CourseInfo>(&format!(
        "SELECT {COLUMNS} FROM course_infos WHERE user_id = $1 ORDER BY course_code"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Deletes the course and, through cascades, its outline, quizzes and notes.
pub(crate) async fn delete_for_user(
    pool: &PgPool,
    user_id: &str,
    id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM course_infos WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
