pub(crate) mod auth;
pub(crate) mod chat;
pub(crate) mod courses;
pub(crate) mod dashboard;
pub(crate) mod errors;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod notes;
pub(crate) mod progress;
pub(crate) mod quizzes;
pub(crate) mod router;
pub(crate) mod validation;
