use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::metrics;
use crate::services::personas::Persona;

const FENCE: &str = "```";

/// Removes markdown code-fence markers (with an optional `json` tag) the model wraps
/// around its answer.
pub(crate) fn strip_code_fences(raw: &str) -> String {
    let mut segments = raw.split(FENCE);
    let mut cleaned = String::with_capacity(raw.len());
    cleaned.push_str(segments.next().unwrap_or_default());

    for segment in segments {
        let tagged = segment.get(..4).is_some_and(|tag| tag.eq_ignore_ascii_case("json"));
        cleaned.push_str(if tagged { &segment[4..] } else { segment });
    }

    cleaned.trim().to_string()
}

/// Parses a model answer as `T`. Invalid answers are logged and yield `None`.
pub(crate) fn parse_ai_json<T: DeserializeOwned>(persona: Persona, raw: &str) -> Option<T> {
    let cleaned = strip_code_fences(raw);

    match serde_json::from_str::<T>(&cleaned) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            metrics::record_ai_parse_failure(persona.as_str());
            tracing::warn!(
                persona = persona.as_str(),
                error = %err,
                cleaned = %truncate_for_log(&cleaned),
                "AI response is not the expected JSON"
            );
            None
        }
    }
}

pub(crate) fn is_empty_object(value: &Value) -> bool {
    value.as_object().is_some_and(|object| object.is_empty())
}

fn truncate_for_log(text: &str) -> &str {
    const LIMIT: usize = 2_000;
    match text.char_indices().nth(LIMIT) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
