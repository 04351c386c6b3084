use std::collections::HashMap;

use sqlx::PgPool;

use crate::core::metrics;
use crate::core::time::primitive_now_utc;
use crate::db::models::{QuizQuestion, StudentProgress};
use crate::repositories::outlines::StudyTarget;
use crate::repositories::progress::{self, RecordAttempt};
use crate::services::quiz_generation::parse_option_letter;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct QuestionResult {
    pub(crate) question_id: String,
    pub(crate) selected: Option<char>,
    pub(crate) correct_option: String,
    pub(crate) is_correct: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Grade {
    pub(crate) correct: usize,
    pub(crate) total: usize,
    pub(crate) results: Vec<QuestionResult>,
}

impl Grade {
    pub(crate) fn score_percent(&self) -> f64 {
        percentage(self.correct, self.total)
    }
}

/// Rounded to two decimals; an empty quiz scores zero.
pub(crate) fn percentage(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = correct as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

/// Letters compare case-insensitively; unanswered or unreadable answers count as wrong.
pub(crate) fn grade(questions: &[QuizQuestion], answers: &HashMap<String, String>) -> Grade {
    let results: Vec<QuestionResult> = questions
        .iter()
        .map(|question| {
            let selected = answers.get(&question.id).and_then(|answer| parse_option_letter(answer));
            let is_correct =
                selected.is_some_and(|letter| question.correct_option.starts_with(letter));
            QuestionResult {
                question_id: question.id.clone(),
                selected,
                correct_option: question.correct_option.clone(),
                is_correct,
            }
        })
        .collect();

    let correct = results.iter().filter(|result| result.is_correct).count();
    Grade { correct, total: results.len(), results }
}

/// Grades a submission and adds it to the student's running totals for the quiz.
pub(crate) async fn submit(
    pool: &PgPool,
    user_id: &str,
    target: &StudyTarget,
    questions: &[QuizQuestion],
    answers: &HashMap<String, String>,
) -> Result<(Grade, StudentProgress), sqlx::Error> {
    let grade = grade(questions, answers);
    let quiz_name = target.quiz_name();

    let progress = progress::record_attempt(
        pool,
        RecordAttempt {
            user_id,
            quiz_name: &quiz_name,
            course_name: &target.course_name,
            correct: grade.correct as i32,
            total: grade.total as i32,
            score: grade.score_percent(),
            now: primitive_now_utc(),
        },
    )
    .await?;

    metrics::record_quiz_submission(grade.correct, grade.total);
    tracing::info!(
        user_id,
        quiz = %quiz_name,
        correct = grade.correct,
        total = grade.total,
        attempts = progress.attempts,
        "Quiz submitted"
    );
    Ok((grade, progress))
}
