use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::schemas::chat::ChatMessageResponse;
use crate::schemas::course::CourseInfoResponse;
use crate::schemas::progress::ProgressResponse;
use crate::schemas::user::UserResponse;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AskRequest {
    #[validate(length(min = 1, max = 2000, message = "question must be 1-2000 characters long"))]
    pub(crate) question: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AskResponse {
    pub(crate) user_message: ChatMessageResponse,
    pub(crate) ai_message: ChatMessageResponse,
    /// The course the answer described, when it described one.
    pub(crate) course_info: Option<CourseInfoResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DashboardResponse {
    pub(crate) user: UserResponse,
    pub(crate) course_infos: Vec<CourseInfoResponse>,
    pub(crate) recent_messages: Vec<ChatMessageResponse>,
    pub(crate) progress: Vec<ProgressResponse>,
}
