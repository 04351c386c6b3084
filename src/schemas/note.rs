use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::Note;

#[derive(Debug, Deserialize)]
pub(crate) struct NoteCreate {
    /// Id of the course as listed by `/courses`.
    pub(crate) course_id: String,
    pub(crate) topic_id: String,
    #[serde(default)]
    pub(crate) subtopic_id: Option<String>,
    #[serde(default)]
    pub(crate) regenerate: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct NoteResponse {
    pub(crate) id: String,
    pub(crate) topic_id: String,
    pub(crate) subtopic_id: Option<String>,
    pub(crate) title: String,
    pub(crate) markdown: String,
    pub(crate) html: String,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl NoteResponse {
    pub(crate) fn from_db(note: Note) -> Self {
        Self {
            id: note.id,
            topic_id: note.topic_id,
            subtopic_id: note.subtopic_id,
            title: note.title,
            markdown: note.markdown,
            html: note.html,
            created_at: format_primitive(note.created_at),
            updated_at: format_primitive(note.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct NoteSummaryResponse {
    pub(crate) id: String,
    pub(crate) topic_id: String,
    pub(crate) subtopic_id: Option<String>,
    pub(crate) title: String,
    pub(crate) updated_at: String,
}

impl NoteSummaryResponse {
    pub(crate) fn from_db(note: Note) -> Self {
        Self {
            id: note.id,
            topic_id: note.topic_id,
            subtopic_id: note.subtopic_id,
            title: note.title,
            updated_at: format_primitive(note.updated_at),
        }
    }
}
