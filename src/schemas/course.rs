use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{CourseInfo, Subtopic};
use crate::services::outline::{CourseOutline, TopicOutline};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseInfoCreate {
    #[validate(length(min = 1, max = 64, message = "course_code must be 1-64 characters long"))]
    pub(crate) course_code: String,
    #[validate(length(min = 1, max = 200, message = "course_name must be 1-200 characters long"))]
    pub(crate) course_name: String,
    #[serde(default)]
    pub(crate) description: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseInfoResponse {
    pub(crate) id: String,
    pub(crate) course_code: String,
    pub(crate) course_name: String,
    pub(crate) description: String,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl CourseInfoResponse {
    pub(crate) fn from_db(info: CourseInfo) -> Self {
        Self {
            id: info.id,
            course_code: info.course_code,
            course_name: info.course_name,
            description: info.description,
            created_at: format_primitive(info.created_at),
            updated_at: format_primitive(info.updated_at),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OutlineRequest {
    #[serde(default)]
    pub(crate) regenerate: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubtopicResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) position: i32,
}

#[derive(Debug, Serialize)]
pub(crate) struct TopicResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) position: i32,
    pub(crate) subtopics: Vec<SubtopicResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseOutlineResponse {
    pub(crate) outline_id: String,
    pub(crate) course_code: String,
    pub(crate) course_name: String,
    pub(crate) created_at: String,
    pub(crate) topics: Vec<TopicResponse>,
}

impl CourseOutlineResponse {
    pub(crate) fn from_outline(outline: CourseOutline) -> Self {
        Self {
            outline_id: outline.course.id,
            course_code: outline.course.course_code,
            course_name: outline.course.course_name,
            created_at: format_primitive(outline.course.created_at),
            topics: outline.topics.into_iter().map(topic_response).collect(),
        }
    }
}

fn topic_response(entry: TopicOutline) -> TopicResponse {
    TopicResponse {
        id: entry.topic.id,
        name: entry.topic.name,
        position: entry.topic.position,
        subtopics: entry.subtopics.into_iter().map(subtopic_response).collect(),
    }
}

fn subtopic_response(subtopic: Subtopic) -> SubtopicResponse {
    SubtopicResponse { id: subtopic.id, name: subtopic.name, position: subtopic.position }
}

#[derive(Debug, Serialize)]
pub(crate) struct OutlineResponse {
    /// Whether the AI produced this outline in the current request.
    pub(crate) generated: bool,
    #[serde(flatten)]
    pub(crate) outline: CourseOutlineResponse,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseDetailResponse {
    #[serde(flatten)]
    pub(crate) info: CourseInfoResponse,
    pub(crate) outline: Option<CourseOutlineResponse>,
}
