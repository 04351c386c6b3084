use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::ChatMessage;
use crate::db::types::{ChatChannel, ChatSender};

#[derive(Debug, Deserialize)]
pub(crate) struct ChatRequest {
    #[serde(default)]
    pub(crate) message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatResponse {
    pub(crate) response: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChatHistoryQuery {
    #[serde(default)]
    pub(crate) limit: Option<i64>,
    #[serde(default)]
    pub(crate) channel: Option<ChatChannel>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessageResponse {
    pub(crate) id: String,
    pub(crate) channel: ChatChannel,
    pub(crate) sender: ChatSender,
    pub(crate) text: String,
    pub(crate) course_info_id: Option<String>,
    pub(crate) created_at: String,
}

impl ChatMessageResponse {
    pub(crate) fn from_db(message: ChatMessage) -> Self {
        Self {
            id: message.id,
            channel: message.channel,
            sender: message.sender,
            text: message.text,
            course_info_id: message.course_info_id,
            created_at: format_primitive(message.created_at),
        }
    }
}
