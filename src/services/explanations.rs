use crate::core::state::AppState;
use crate::repositories::quiz_questions::QuestionWithContext;
use crate::services::llm::{GenerationError, GenerationRequest};
use crate::services::personas::Persona;
use crate::services::quiz_generation::OPTION_LETTERS;

pub(crate) fn explanation_prompt(context: &QuestionWithContext) -> String {
    let question = &context.question;
    let mut prompt = format!(
        "Course: {}\nTopic: {}\nQuestion: {}\n",
        context.course_name, context.topic_name, question.question
    );
    for (letter, option) in OPTION_LETTERS.iter().zip(question.options.iter()) {
        prompt.push_str(&format!("{letter}) {option}\n"));
    }
    prompt.push_str(&format!("Correct answer: {}", question.correct_option));
    prompt
}

pub(crate) async fn explain(
    state: &AppState,
    context: &QuestionWithContext,
) -> Result<String, GenerationError> {
    let raw = state
        .generator()
        .generate(GenerationRequest::new(Persona::Explanation, explanation_prompt(context)))
        .await
        .map_err(GenerationError::Upstream)?;

    let explanation = raw.trim();
    if explanation.is_empty() {
        return Err(GenerationError::Unusable("explanation"));
    }
    Ok(explanation.to_string())
}
