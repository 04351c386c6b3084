use validator::Validate;

use crate::api::errors::ApiError;

pub(crate) const DEFAULT_HISTORY_LIMIT: i64 = 50;
pub(crate) const MAX_HISTORY_LIMIT: i64 = 200;
pub(crate) const MAX_MESSAGE_CHARS: usize = 4_000;

pub(crate) fn validate_payload(payload: &impl Validate) -> Result<(), ApiError> {
    payload.validate().map_err(|e| ApiError::UnprocessableEntity(e.to_string()))
}

/// Trimmed chat text; blank or oversized messages are rejected.
pub(crate) fn chat_message(message: &str) -> Result<&str, ApiError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ApiError::BadRequest(format!(
            "message must be at most {MAX_MESSAGE_CHARS} characters long"
        )));
    }
    Ok(message)
}

pub(crate) fn history_limit(requested: Option<i64>) -> i64 {
    requested.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, MAX_HISTORY_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_message_is_trimmed() {
        assert_eq!(chat_message("  What is CS101?\n").unwrap(), "What is CS101?");
    }

    #[test]
    fn blank_and_oversized_messages_are_rejected() {
        assert!(matches!(chat_message("   "), Err(ApiError::BadRequest(_))));
        let long = "x".repeat(MAX_MESSAGE_CHARS + 1);
        assert!(matches!(chat_message(&long), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn history_limit_is_clamped() {
        assert_eq!(history_limit(None), DEFAULT_HISTORY_LIMIT);
        assert_eq!(history_limit(Some(0)), 1);
        assert_eq!(history_limit(Some(10_000)), MAX_HISTORY_LIMIT);
    }
}
