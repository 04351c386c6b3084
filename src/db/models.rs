use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{ChatChannel, ChatSender, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) hashed_password: String,
    pub(crate) role: UserRole,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ChatMessage {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) course_info_id: Option<String>,
    pub(crate) channel: ChatChannel,
    pub(crate) sender: ChatSender,
    pub(crate) text: String,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct CourseInfo {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) course_code: String,
    pub(crate) course_name: String,
    pub(crate) description: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Course {
    pub(crate) id: String,
    pub(crate) course_info_id: String,
    pub(crate) user_id: String,
    pub(crate) course_code: String,
    pub(crate) course_name: String,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Topic {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) name: String,
    pub(crate) position: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Subtopic {
    pub(crate) id: String,
    pub(crate) topic_id: String,
    pub(crate) name: String,
    pub(crate) position: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct QuizQuestion {
    pub(crate) id: String,
    pub(crate) topic_id: String,
    pub(crate) subtopic_id: Option<String>,
    pub(crate) question: String,
    pub(crate) options: Json<Vec<String>>,
    pub(crate) correct_option: String,
    pub(crate) position: i32,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Note {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) topic_id: String,
    pub(crate) subtopic_id: Option<String>,
    pub(crate) title: String,
    pub(crate) markdown: String,
    pub(crate) html: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct StudentProgress {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) quiz_name: String,
    pub(crate) course_name: String,
    pub(crate) attempts: i32,
    pub(crate) correct_answers: i32,
    pub(crate) total_questions: i32,
    pub(crate) last_score: f64,
    pub(crate) updated_at: PrimitiveDateTime,
}
