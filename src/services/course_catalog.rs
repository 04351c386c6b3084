use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::CourseInfo;
use crate::db::types::ChatChannel;
use crate::repositories::chat_messages;
use crate::repositories::course_infos::{self, UpsertCourseInfo};
use crate::services::ai_json::{is_empty_object, parse_ai_json};
use crate::services::conversation::{converse, Exchange};
use crate::services::llm::GenerationError;
use crate::services::personas::Persona;

#[derive(Debug, Deserialize)]
struct CourseInfoAnswer {
    #[serde(default)]
    course_code: String,
    #[serde(default)]
    course_name: String,
    #[serde(default)]
    description: String,
}

const MAX_COURSE_CODE_CHARS: usize = 64;
const MAX_COURSE_NAME_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CourseDetails {
    pub(crate) course_code: String,
    pub(crate) course_name: String,
    pub(crate) description: String,
}

impl CourseDetails {
    /// `None` when the code or name is blank or longer than the catalogue columns allow.
    pub(crate) fn new(course_code: &str, course_name: &str, description: &str) -> Option<Self> {
        let course_code = normalize_course_code(course_code);
        let course_name = course_name.trim();
        if course_code.is_empty() || course_name.is_empty() {
            return None;
        }
        if course_code.chars().count() > MAX_COURSE_CODE_CHARS
            || course_name.chars().count() > MAX_COURSE_NAME_CHARS
        {
            tracing::warn!(
                code_chars = course_code.chars().count(),
                name_chars = course_name.chars().count(),
                "Course code or name is too long"
            );
            return None;
        }
        Some(Self {
            course_code,
            course_name: course_name.to_string(),
            description: description.trim().to_string(),
        })
    }
}

/// `" cs  101 "` and `"CS 101"` name the same course.
pub(crate) fn normalize_course_code(code: &str) -> String {
    code.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase()
}

/// Reads the course-lookup answer. `{}` (an off-topic question), malformed JSON and
/// objects without a code or name all yield `None`.
pub(crate) fn parse_course_info(raw: &str) -> Option<CourseDetails> {
    let value: Value = parse_ai_json(Persona::CourseLookup, raw)?;
    if is_empty_object(&value) {
        tracing::debug!("Course lookup answered with an empty object");
        return None;
    }

    let answer: CourseInfoAnswer = match serde_json::from_value(value) {
        Ok(answer) => answer,
        Err(err) => {
            tracing::warn!(error = %err, "Course lookup answer has an unexpected shape");
            return None;
        }
    };
    CourseDetails::new(&answer.course_code, &answer.course_name, &answer.description)
}

/// Inserts the course or refreshes the one with the same code. Returns whether a row was
/// created.
pub(crate) async fn reconcile(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: &str,
    details: &CourseDetails,
) -> Result<(CourseInfo, bool), sqlx::Error> {
    let (info, created) = course_infos::upsert(
        executor,
        UpsertCourseInfo {
            id: &Uuid::new_v4().to_string(),
            user_id,
            course_code: &details.course_code,
            course_name: &details.course_name,
            description: &details.description,
            now: primitive_now_utc(),
        },
    )
    .await?;

    tracing::info!(
        user_id,
        course_code = %info.course_code,
        created,
        "Course info reconciled"
    );
    Ok((info, created))
}

#[derive(Debug)]
pub(crate) struct Discovery {
    pub(crate) exchange: Exchange,
    pub(crate) course_info: Option<CourseInfo>,
}

/// Asks the course-lookup persona about a course and stores what it found.
pub(crate) async fn discover(
    state: &AppState,
    user_id: &str,
    question: &str,
) -> Result<Discovery, GenerationError> {
    let mut exchange =
        converse(state, user_id, ChatChannel::CourseLookup, Persona::CourseLookup, question)
            .await?;

    let Some(details) = parse_course_info(&exchange.ai_message.text) else {
        return Ok(Discovery { exchange, course_info: None });
    };

    let mut tx = state.db().begin().await?;
    let (info, _) = reconcile(&mut *tx, user_id, &details).await?;
    chat_messages::attach_course_info(&mut *tx, &exchange.ai_message.id, &info.id).await?;
    tx.commit().await?;
    exchange.ai_message.course_info_id = Some(info.id.clone());

    Ok(Discovery { exchange, course_info: Some(info) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_course_answer() {
        let raw = "```json\n{\n  \"course_code\": \" cs 101\",\n  \"course_name\": \"Introduction to Programming\",\n  \"description\": \"Basics of programming.\\nWith Python.\"\n}\n```";

        let details = parse_course_info(raw).expect("course details");

        assert_eq!(details.course_code, "CS 101");
        assert_eq!(details.course_name, "Introduction to Programming");
        assert_eq!(details.description, "Basics of programming.\nWith Python.");
    }

    #[test]
    fn empty_object_means_no_course() {
        assert_eq!(parse_course_info("```json\n{}\n```"), None);
    }

    #[test]
    fn prose_or_partial_answers_are_ignored() {
        assert_eq!(parse_course_info("I am not sure which course you mean."), None);
        assert_eq!(parse_course_info(r#"{"course_code": "MATH201"}"#), None);
        assert_eq!(parse_course_info(r#"["CS101"]"#), None);
    }

    #[test]
    fn missing_description_defaults_to_empty() {
        let details =
            parse_course_info(r#"{"course_code": "phys101", "course_name": "Physics I"}"#)
                .expect("course details");
        assert_eq!(details.course_code, "PHYS101");
        assert!(details.description.is_empty());
    }

    #[test]
    fn over_long_code_or_name_is_not_a_course() {
        let long_code = "X".repeat(80);
        let raw = format!(r#"{{"course_code": "{long_code}", "course_name": "Physics I"}}"#);
        assert_eq!(parse_course_info(&raw), None);

        let long_name = "Physics ".repeat(30);
        assert_eq!(CourseDetails::new("PHYS101", &long_name, ""), None);

        let code = "Ü".repeat(MAX_COURSE_CODE_CHARS);
        let details = CourseDetails::new(&code, "Umlauts", "").expect("code at the limit");
        assert_eq!(details.course_code.chars().count(), MAX_COURSE_CODE_CHARS);
    }

    #[test]
    fn course_codes_collapse_whitespace_and_case() {
        assert_eq!(normalize_course_code("  cs \t 101 "), "CS 101");
        assert_eq!(normalize_course_code("Math201"), "MATH201");
    }
}
