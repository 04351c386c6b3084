pub(crate) mod ai_json;
pub(crate) mod conversation;
pub(crate) mod course_catalog;
pub(crate) mod explanations;
pub(crate) mod grading;
pub(crate) mod llm;
pub(crate) mod notes;
pub(crate) mod outline;
pub(crate) mod personas;
pub(crate) mod quiz_generation;
