use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::db::models::{Course, CourseInfo, Subtopic, Topic};

const COURSE_COLUMNS: &str = "id, course_info_id, user_id, course_code, course_name, created_at";

/// A topic or subtopic together with the course it belongs to.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct StudyTarget {
    pub(crate) course_info_id: String,
    pub(crate) course_id: String,
    pub(crate) course_code: String,
    pub(crate) course_name: String,
    pub(crate) topic_id: String,
    pub(crate) topic_name: String,
    pub(crate) subtopic_id: Option<String>,
    pub(crate) subtopic_name: Option<String>,
}

impl StudyTarget {
    /// Name progress is recorded under: the topic, or `"topic - subtopic"`.
    pub(crate) fn quiz_name(&self) -> String {
        match &self.subtopic_name {
            Some(subtopic) => format!("{} - {}", self.topic_name, subtopic),
            None => self.topic_name.clone(),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match &self.subtopic_name {
            Some(subtopic) => format!(
                "the subtopic \"{}\" of the topic \"{}\" in the course {} {}",
                subtopic, self.topic_name, self.course_code, self.course_name
            ),
            None => format!(
                "the topic \"{}\" in the course {} {}",
                self.topic_name, self.course_code, self.course_name
            ),
        }
    }
}

pub(crate) struct OutlineTopic<'a> {
    pub(crate) name: &'a str,
    pub(crate) subtopics: &'a [String],
}

pub(crate) async fn find_course_by_info(
    pool: &PgPool,
    course_info_id: &str,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses WHERE course_info_id = $1"
    ))
    .bind(course_info_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_topics(pool: &PgPool, course_id: &str) -> Result<Vec<Topic>, sqlx::Error> {
    sqlx::query_as::<_, Topic>(
        "SELECT id, course_id, name, position FROM topics WHERE course_id = $1 ORDER BY position",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_subtopics_for_course(
    pool: &PgPool,
    course_id: &str,
) -> Result<Vec<Subtopic>, sqlx::Error> {
    sqlx::query_as::<_, Subtopic>(
        "SELECT s.id, s.topic_id, s.name, s.position
         FROM subtopics s
         JOIN topics t ON t.id = s.topic_id
         WHERE t.course_id = $1
         ORDER BY t.position, s.position",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
}

/// Drops any previous outline of the course (with its quizzes and notes) and stores the
/// new one, all in one transaction.
pub(crate) async fn replace_outline(
    pool: &PgPool,
    course_info: &CourseInfo,
    course_name: &str,
    topics: &[OutlineTopic<'_>],
    now: time::PrimitiveDateTime,
) -> Result<Course, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM courses WHERE course_info_id = $1")
        .bind(&course_info.id)
        .execute(&mut *tx)
        .await?;

    let course = sqlx::query_as::<_, Course>(&format!(
        "INSERT INTO courses (id, course_info_id, user_id, course_code, course_name, created_at)
         VALUES ($1,$2,$3,$4,$5,$6)
         RETURNING {COURSE_COLUMNS}",
    ))
    .bind(Uuid::new_v4().to_string())
    .bind(&course_info.id)
    .bind(&course_info.user_id)
    .bind(&course_info.course_code)
    .bind(course_name)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    for (topic_index, topic) in topics.iter().enumerate() {
        let topic_id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO topics (id, course_id, name, position) VALUES ($1,$2,$3,$4)")
            .bind(&topic_id)
            .bind(&course.id)
            .bind(topic.name)
            .bind(topic_index as i32)
            .execute(&mut *tx)
            .await?;

        for (subtopic_index, subtopic) in topic.subtopics.iter().enumerate() {
            sqlx::query(
                "INSERT INTO subtopics (id, topic_id, name, position) VALUES ($1,$2,$3,$4)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&topic_id)
            .bind(subtopic)
            .bind(subtopic_index as i32)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;
    Ok(course)
}

pub(crate) async fn find_topic_target(
    pool: &PgPool,
    user_id: &str,
    topic_id: &str,
) -> Result<Option<StudyTarget>, sqlx::Error> {
    sqlx::query_as::<_, StudyTarget>(
        "SELECT c.course_info_id, c.id AS course_id, c.course_code, c.course_name,
                t.id AS topic_id, t.name AS topic_name,
                NULL::text AS subtopic_id, NULL::text AS subtopic_name
         FROM topics t
         JOIN courses c ON c.id = t.course_id
         WHERE t.id = $1 AND c.user_id = $2",
    )
    .bind(topic_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn find_subtopic_target(
    pool: &PgPool,
    user_id: &str,
    subtopic_id: &str,
) -> Result<Option<StudyTarget>, sqlx::Error> {
    sqlx::query_as::<_, StudyTarget>(
        "SELECT c.course_info_id, c.id AS course_id, c.course_code, c.course_name,
                t.id AS topic_id, t.name AS topic_name,
                s.id AS subtopic_id, s.name AS subtopic_name
         FROM subtopics s
         JOIN topics t ON t.id = s.topic_id
         JOIN courses c ON c.id = t.course_id
         WHERE s.id = $1 AND c.user_id = $2",
    )
    .bind(subtopic_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
