pub(crate) mod chat_messages;
pub(crate) mod course_infos;
pub(crate) mod notes;
pub(crate) mod outlines;
pub(crate) mod progress;
pub(crate) mod quiz_questions;
pub(crate) mod users;
