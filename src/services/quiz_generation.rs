use serde::Deserialize;

use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::QuizQuestion;
use crate::repositories::outlines::StudyTarget;
use crate::repositories::quiz_questions::{self, NewQuestion};
use crate::services::ai_json::parse_ai_json;
use crate::services::llm::{GenerationError, GenerationRequest};
use crate::services::personas::Persona;

pub(crate) const OPTION_LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

#[derive(Debug, Deserialize)]
struct QuizAnswer {
    #[serde(default)]
    questions: Vec<QuestionAnswer>,
}

#[derive(Debug, Deserialize)]
struct QuestionAnswer {
    #[serde(default)]
    question: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default, alias = "answer", alias = "correct_option")]
    correct: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QuestionDraft {
    pub(crate) question: String,
    pub(crate) options: Vec<String>,
    pub(crate) correct_option: char,
}

/// Splits `"B) Stack"`, `"b. Stack"` or `"B: Stack"` into its letter and text.
fn option_label(option: &str) -> Option<(char, &str)> {
    let mut chars = option.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    match chars.next() {
        Some(')' | '.' | ':') if OPTION_LETTERS.contains(&letter) => {
            Some((letter, option[2..].trim_start()))
        }
        _ => None,
    }
}

/// Removes `A)` to `D)` labels, but only when every option carries the label of its own
/// position. Otherwise the options are kept as written, so `"B. subtilis"` survives.
pub(crate) fn strip_option_labels(options: &[String]) -> Vec<String> {
    let labelled: Option<Vec<&str>> = options
        .iter()
        .zip(OPTION_LETTERS)
        .map(|(option, expected)| match option_label(option.trim()) {
            Some((letter, text)) if letter == expected => Some(text),
            _ => None,
        })
        .collect();

    match labelled {
        Some(texts) if texts.len() == options.len() => {
            texts.into_iter().map(str::to_string).collect()
        }
        _ => options.iter().map(|option| option.trim().to_string()).collect(),
    }
}

pub(crate) fn parse_option_letter(value: &str) -> Option<char> {
    let value = value.trim();
    let letter = strip_option_label_letter(value)?.to_ascii_uppercase();
    OPTION_LETTERS.contains(&letter).then_some(letter)
}

// Accepts "A" as well as "A) text" for the correct answer.
fn strip_option_label_letter(value: &str) -> Option<char> {
    let mut chars = value.chars();
    let letter = chars.next()?;
    match chars.next() {
        None | Some(')' | '.' | ':' | '-' | ' ') => Some(letter),
        Some(_) => None,
    }
}

fn validate_question(answer: QuestionAnswer) -> Option<QuestionDraft> {
    let question = answer.question.trim();
    if question.is_empty() || answer.options.len() != OPTION_LETTERS.len() {
        return None;
    }

    let options = strip_option_labels(&answer.options);
    if options.iter().any(|option| option.is_empty()) {
        return None;
    }

    let correct_option = parse_option_letter(&answer.correct)?;
    Some(QuestionDraft { question: question.to_string(), options, correct_option })
}

/// Keeps the well-formed questions of a quiz answer, at most `limit` of them.
pub(crate) fn parse_quiz(raw: &str, limit: usize) -> Vec<QuestionDraft> {
    let Some(answer) = parse_ai_json::<QuizAnswer>(Persona::Quiz, raw) else {
        return Vec::new();
    };

    let received = answer.questions.len();
    let drafts: Vec<QuestionDraft> =
        answer.questions.into_iter().filter_map(validate_question).take(limit).collect();
    if drafts.len() < received.min(limit) {
        tracing::warn!(received, kept = drafts.len(), "Dropped malformed quiz questions");
    }
    drafts
}

pub(crate) fn quiz_prompt(target: &StudyTarget, count: u32) -> String {
    format!(
        "Create {count} multiple-choice questions about {}. \
         Each question must have exactly four options labelled A) to D) and one correct answer.",
        target.describe()
    )
}

fn fallback_prompt(target: &StudyTarget, count: u32) -> String {
    let subject = match &target.subtopic_name {
        Some(subtopic) => format!("{} ({})", subtopic, target.topic_name),
        None => target.topic_name.clone(),
    };
    format!(
        "Return only JSON of the form {{\"questions\": [{{\"question\": \"...\", \
         \"options\": [\"A) ...\", \"B) ...\", \"C) ...\", \"D) ...\"], \"correct\": \"A\"}}]}} \
         with {count} questions on {subject} from the course {}.",
        target.course_name
    )
}

async fn request_questions(
    state: &AppState,
    prompt: String,
    limit: usize,
) -> Result<Vec<QuestionDraft>, GenerationError> {
    let raw = state
        .generator()
        .generate(GenerationRequest::new(Persona::Quiz, prompt))
        .await
        .map_err(GenerationError::Upstream)?;
    Ok(parse_quiz(&raw, limit))
}

/// Generates a quiz for the target and replaces any quiz stored for it. An unusable answer
/// is retried once with a stricter prompt.
pub(crate) async fn generate_quiz(
    state: &AppState,
    target: &StudyTarget,
) -> Result<Vec<QuizQuestion>, GenerationError> {
    let count = state.settings().quiz().question_count;
    let limit = count as usize;

    let mut drafts = request_questions(state, quiz_prompt(target, count), limit).await?;
    if drafts.is_empty() {
        tracing::warn!(quiz = %target.quiz_name(), "Quiz answer unusable; retrying with fallback prompt");
        drafts = request_questions(state, fallback_prompt(target, count), limit).await?;
    }
    if drafts.is_empty() {
        return Err(GenerationError::Unusable("quiz questions"));
    }

    let questions: Vec<NewQuestion<'_>> = drafts
        .iter()
        .map(|draft| NewQuestion {
            question: &draft.question,
            options: &draft.options,
            correct_option: draft.correct_option,
        })
        .collect();
    let stored = quiz_questions::replace_for_target(
        state.db(),
        &target.topic_id,
        target.subtopic_id.as_deref(),
        &questions,
        primitive_now_utc(),
    )
    .await?;

    tracing::info!(quiz = %target.quiz_name(), questions = stored.len(), "Quiz generated");
    Ok(stored)
}
