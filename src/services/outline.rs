use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use sqlx::PgPool;

use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{Course, CourseInfo, Subtopic, Topic};
use crate::repositories::outlines::{self, OutlineTopic};
use crate::services::ai_json::parse_ai_json;
use crate::services::llm::{GenerationError, GenerationRequest};
use crate::services::personas::Persona;

#[derive(Debug, Deserialize)]
struct OutlineAnswer {
    #[serde(default)]
    course_name: Option<String>,
    #[serde(default)]
    topics: Vec<TopicAnswer>,
}

#[derive(Debug, Deserialize)]
struct TopicAnswer {
    #[serde(default)]
    name: String,
    #[serde(default)]
    subtopics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TopicDraft {
    pub(crate) name: String,
    pub(crate) subtopics: Vec<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct OutlineDraft {
    pub(crate) course_name: Option<String>,
    pub(crate) topics: Vec<TopicDraft>,
}

#[derive(Debug, Clone)]
pub(crate) struct TopicOutline {
    pub(crate) topic: Topic,
    pub(crate) subtopics: Vec<Subtopic>,
}

#[derive(Debug, Clone)]
pub(crate) struct CourseOutline {
    pub(crate) course: Course,
    pub(crate) topics: Vec<TopicOutline>,
}

/// Trims names and drops blank entries and repeats within the same parent.
fn normalize_topics(topics: Vec<TopicAnswer>) -> Vec<TopicDraft> {
    let mut seen_topics = HashSet::new();
    let mut drafts = Vec::with_capacity(topics.len());

    for topic in topics {
        let name = topic.name.trim();
        if name.is_empty() || !seen_topics.insert(name.to_string()) {
            continue;
        }

        let mut seen_subtopics = HashSet::new();
        let subtopics = topic
            .subtopics
            .iter()
            .map(|subtopic| subtopic.trim())
            .filter(|subtopic| !subtopic.is_empty() && seen_subtopics.insert(subtopic.to_string()))
            .map(str::to_string)
            .collect();

        drafts.push(TopicDraft { name: name.to_string(), subtopics });
    }

    drafts
}

pub(crate) fn parse_outline(raw: &str) -> Option<OutlineDraft> {
    let answer: OutlineAnswer = parse_ai_json(Persona::Outline, raw)?;
    let topics = normalize_topics(answer.topics);
    if topics.is_empty() {
        tracing::warn!("Outline answer contains no usable topics");
        return None;
    }

    let course_name =
        answer.course_name.map(|name| name.trim().to_string()).filter(|name| !name.is_empty());
    Some(OutlineDraft { course_name, topics })
}

pub(crate) async fn load_outline(
    pool: &PgPool,
    course_info_id: &str,
) -> Result<Option<CourseOutline>, sqlx::Error> {
    let Some(course) = outlines::find_course_by_info(pool, course_info_id).await? else {
        return Ok(None);
    };

    let topics = outlines::list_topics(pool, &course.id).await?;
    let mut by_topic: HashMap<String, Vec<Subtopic>> = HashMap::new();
    for subtopic in outlines::list_subtopics_for_course(pool, &course.id).await? {
        by_topic.entry(subtopic.topic_id.clone()).or_default().push(subtopic);
    }

    let topics = topics
        .into_iter()
        .map(|topic| {
            let subtopics = by_topic.remove(&topic.id).unwrap_or_default();
            TopicOutline { topic, subtopics }
        })
        .collect();

    Ok(Some(CourseOutline { course, topics }))
}

/// Returns the stored outline, or asks the outline persona for one when none exists or
/// `regenerate` is set. The flag in the result tells whether the AI was called.
pub(crate) async fn ensure_outline(
    state: &AppState,
    info: &CourseInfo,
    regenerate: bool,
) -> Result<(CourseOutline, bool), GenerationError> {
    if !regenerate {
        if let Some(outline) = load_outline(state.db(), &info.id).await? {
            return Ok((outline, false));
        }
    }

    let prompt = format!("{} {}", info.course_code, info.course_name);
    let raw = state
        .generator()
        .generate(GenerationRequest::new(Persona::Outline, prompt))
        .await
        .map_err(GenerationError::Upstream)?;
    let draft = parse_outline(&raw).ok_or(GenerationError::Unusable("course outline"))?;

    let course_name = draft.course_name.as_deref().unwrap_or(&info.course_name);
    let topics: Vec<OutlineTopic<'_>> = draft
        .topics
        .iter()
        .map(|topic| OutlineTopic { name: &topic.name, subtopics: &topic.subtopics })
        .collect();
    outlines::replace_outline(state.db(), info, course_name, &topics, primitive_now_utc()).await?;

    tracing::info!(
        course_code = %info.course_code,
        topics = draft.topics.len(),
        regenerate,
        "Course outline generated"
    );

    let outline = load_outline(state.db(), &info.id)
        .await?
        .ok_or(GenerationError::Unusable("course outline"))?;
    Ok((outline, true))
}
