use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::db::models::QuizQuestion;
use crate::repositories::outlines::StudyTarget;
use crate::schemas::progress::ProgressResponse;
use crate::services::grading::{Grade, QuestionResult};
use crate::services::quiz_generation::OPTION_LETTERS;

#[derive(Debug, Serialize)]
pub(crate) struct QuizOption {
    pub(crate) letter: char,
    pub(crate) text: String,
}

/// A question as shown to the student, without its answer.
#[derive(Debug, Serialize)]
pub(crate) struct QuizQuestionView {
    pub(crate) id: String,
    pub(crate) question: String,
    pub(crate) options: Vec<QuizOption>,
    pub(crate) position: i32,
}

impl QuizQuestionView {
    pub(crate) fn from_db(question: QuizQuestion) -> Self {
        let options = OPTION_LETTERS
            .iter()
            .zip(question.options.0)
            .map(|(letter, text)| QuizOption { letter: *letter, text })
            .collect();
        Self { id: question.id, question: question.question, options, position: question.position }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizResponse {
    pub(crate) quiz_name: String,
    pub(crate) course_name: String,
    pub(crate) topic_id: String,
    pub(crate) subtopic_id: Option<String>,
    pub(crate) questions: Vec<QuizQuestionView>,
}

impl QuizResponse {
    pub(crate) fn new(target: &StudyTarget, questions: Vec<QuizQuestion>) -> Self {
        Self {
            quiz_name: target.quiz_name(),
            course_name: target.course_name.clone(),
            topic_id: target.topic_id.clone(),
            subtopic_id: target.subtopic_id.clone(),
            questions: questions.into_iter().map(QuizQuestionView::from_db).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuizSubmission {
    #[serde(default)]
    pub(crate) answers: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionResultResponse {
    pub(crate) question_id: String,
    pub(crate) selected: Option<char>,
    pub(crate) correct_option: String,
    pub(crate) is_correct: bool,
}

impl From<QuestionResult> for QuestionResultResponse {
    fn from(result: QuestionResult) -> Self {
        Self {
            question_id: result.question_id,
            selected: result.selected,
            correct_option: result.correct_option,
            is_correct: result.is_correct,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizResultResponse {
    pub(crate) quiz_name: String,
    pub(crate) correct: usize,
    pub(crate) total: usize,
    pub(crate) score_percent: f64,
    pub(crate) results: Vec<QuestionResultResponse>,
    pub(crate) progress: ProgressResponse,
}

impl QuizResultResponse {
    pub(crate) fn new(quiz_name: String, grade: Grade, progress: ProgressResponse) -> Self {
        Self {
            quiz_name,
            correct: grade.correct,
            total: grade.total,
            score_percent: grade.score_percent(),
            results: grade.results.into_iter().map(QuestionResultResponse::from).collect(),
            progress,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ExplanationResponse {
    pub(crate) question_id: String,
    pub(crate) explanation: String,
}
