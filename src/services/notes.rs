use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};
use uuid::Uuid;

use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::Note;
use crate::repositories::notes::{self, SaveNote};
use crate::repositories::outlines::StudyTarget;
use crate::services::llm::{GenerationError, GenerationRequest};
use crate::services::personas::Persona;

const ALLOWED_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// Relative URLs and http, https or mailto links are kept; anything else becomes `#`.
fn is_safe_destination(url: &str) -> bool {
    let compact: String =
        url.chars().filter(|ch| !ch.is_ascii_whitespace() && !ch.is_control()).collect();
    let scheme_end = compact.find(|ch: char| matches!(ch, ':' | '/' | '?' | '#'));
    match scheme_end {
        Some(index) if compact[index..].starts_with(':') => {
            let scheme = &compact[..index];
            ALLOWED_SCHEMES.iter().any(|allowed| scheme.eq_ignore_ascii_case(allowed))
        }
        _ => true,
    }
}

fn sanitize_destination(url: CowStr<'_>) -> CowStr<'_> {
    if is_safe_destination(&url) {
        url
    } else {
        tracing::warn!(url = %url, "Dropped unsafe link from lecture note");
        CowStr::Borrowed("#")
    }
}

/// Renders markdown to HTML. Raw HTML in the source is shown as text and link or image
/// targets with other schemes than http, https or mailto are replaced.
pub(crate) fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link { link_type, dest_url, title, id }) => Event::Start(Tag::Link {
            link_type,
            dest_url: sanitize_destination(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image { link_type, dest_url, title, id }) => Event::Start(Tag::Image {
            link_type,
            dest_url: sanitize_destination(dest_url),
            title,
            id,
        }),
        other => other,
    });

    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}

/// Models often wrap the whole note in a ```` ```markdown ```` block.
pub(crate) fn unwrap_markdown_block(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    match body.split_once('\n') {
        Some((tag, content)) if tag.trim().chars().all(|ch| ch.is_ascii_alphanumeric()) => {
            content.trim()
        }
        _ => trimmed,
    }
}

pub(crate) fn note_title(target: &StudyTarget) -> String {
    format!("{}: {}", target.course_code, target.quiz_name())
}

fn note_prompt(target: &StudyTarget) -> String {
    format!("Write lecture notes on {}.", target.describe())
}

/// Returns the cached note for the target, generating (or regenerating) it when asked.
/// The flag in the result tells whether the AI was called.
pub(crate) async fn ensure_note(
    state: &AppState,
    target: &StudyTarget,
    regenerate: bool,
) -> Result<(Note, bool), GenerationError> {
    let subtopic_id = target.subtopic_id.as_deref();
    if !regenerate {
        if let Some(note) = notes::find_for_target(state.db(), &target.topic_id, subtopic_id).await?
        {
            return Ok((note, false));
        }
    }

    let raw = state
        .generator()
        .generate(GenerationRequest::new(Persona::LectureNotes, note_prompt(target)))
        .await
        .map_err(GenerationError::Upstream)?;
    let markdown = unwrap_markdown_block(&raw);
    if markdown.is_empty() {
        return Err(GenerationError::Unusable("lecture note"));
    }

    let title = note_title(target);
    let note = notes::replace_for_target(
        state.db(),
        SaveNote {
            id: &Uuid::new_v4().to_string(),
            course_id: &target.course_id,
            topic_id: &target.topic_id,
            subtopic_id,
            title: &title,
            markdown,
            html: &render_markdown(markdown),
            now: primitive_now_utc(),
        },
    )
    .await?;

    tracing::info!(note_id = %note.id, title = %note.title, regenerate, "Lecture note generated");
    Ok((note, true))
}
