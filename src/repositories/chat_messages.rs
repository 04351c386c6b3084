use sqlx::PgPool;

use crate::db::models::ChatMessage;
use crate::db::types::{ChatChannel, ChatSender};

const COLUMNS: &str = "id, user_id, course_info_id, channel, sender, text, created_at";

pub(crate) struct CreateMessage<'a> {
    pub(crate) id: &'a str,
    pub(crate) user_id: &'a str,
    pub(crate) course_info_id: Option<&'a str>,
    pub(crate) channel: ChatChannel,
    pub(crate) sender: ChatSender,
    pub(crate) text: &'a str,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateMessage<'_>,
) -> Result<ChatMessage, sqlx::Error> {
    sqlx::query_as::<_, ChatMessage>(&format!(
        "INSERT INTO chat_messages (id, user_id, course_info_id, channel, sender, text, created_at)
         VALUES ($1,$2,$3,$4,$5,$6,$7)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.user_id)
    .bind(params.course_info_id)
    .bind(params.channel)
    .bind(params.sender)
    .bind(params.text)
    .bind(params.created_at)
    .fetch_one(executor)
    .await
}

/// The latest `limit` messages of one channel, returned oldest first.
pub(crate) async fn list_recent(
    pool: &PgPool,
    user_id: &str,
    channel: Option<ChatChannel>,
    limit: i64,
) -> Result<Vec<ChatMessage>, sqlx::Error> {
    let mut messages = sqlx::query_as::<_, ChatMessage>(&format!(
        "SELECT {COLUMNS}
         FROM chat_messages
         WHERE user_id = $1 AND ($2::chatchannel IS NULL OR channel = $2)
         ORDER BY created_at DESC, sender DESC
         LIMIT $3",
    ))
    .bind(user_id)
    .bind(channel)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    messages.reverse();
    Ok(messages)
}

pub(crate) async fn attach_course_info(
    executor: impl sqlx::PgExecutor<'_>,
    message_id: &str,
    course_info_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE chat_messages SET course_info_id = $1 WHERE id = $2")
        .bind(course_info_id)
        .bind(message_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub(crate) async fn delete_for_user(
    pool: &PgPool,
    user_id: &str,
    channel: Option<ChatChannel>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM chat_messages WHERE user_id = $1 AND ($2::chatchannel IS NULL OR channel = $2)",
    )
    .bind(user_id)
    .bind(channel)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
