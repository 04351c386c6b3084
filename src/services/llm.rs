use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;

use crate::core::config::Settings;
use crate::core::metrics;
use crate::db::models::ChatMessage;
use crate::services::personas::Persona;

#[derive(Debug, Clone)]
pub(crate) struct GenerationRequest {
    pub(crate) persona: Persona,
    pub(crate) prompt: String,
}

impl GenerationRequest {
    pub(crate) fn new(persona: Persona, prompt: impl Into<String>) -> Self {
        Self { persona, prompt: prompt.into() }
    }
}

/// Anything that can turn a persona and a prompt into model text.
#[async_trait]
pub(crate) trait TextGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String>;
}

/// Failure of an AI-backed operation, as seen by handlers.
#[derive(Debug, Error)]
pub(crate) enum GenerationError {
    #[error("AI request failed")]
    Upstream(#[source] anyhow::Error),
    #[error("AI response could not be used: {0}")]
    Unusable(&'static str),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub(crate) struct ChatCompletionsClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
    top_p: f64,
}

impl ChatCompletionsClient {
    pub(crate) fn from_settings(settings: &Settings) -> Result<Self> {
        let ai = settings.ai();
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .timeout(Duration::from_secs(ai.request_timeout))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key: ai.api_key.clone(),
            base_url: ai.base_url.trim_end_matches('/').to_string(),
            model: ai.model.clone(),
            max_tokens: ai.max_tokens,
            temperature: ai.temperature,
            top_p: ai.top_p,
        })
    }

    fn payload(&self, request: &GenerationRequest) -> Value {
        let mut payload = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.persona.system_instruction()},
                {"role": "user", "content": request.prompt}
            ],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "top_p": self.top_p,
        });
        if request.persona.expects_json() {
            payload["response_format"] = json!({"type": "json_object"});
        }
        payload
    }

    async fn call(&self, request: &GenerationRequest) -> Result<(String, Option<u64>)> {
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.payload(request))
            .send()
            .await
            .context("Failed to call AI API")?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        if !status.is_success() {
            anyhow::bail!("AI API returned {status}: {body}");
        }

        let content = extract_message_content(&body)
            .context("Missing AI response content")?
            .to_string();
        let tokens_used = body
            .get("usage")
            .and_then(|usage| usage.get("total_tokens"))
            .and_then(|value| value.as_u64());

        Ok((content, tokens_used))
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionsClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        let persona = request.persona.as_str();
        let timer = Instant::now();
        tracing::info!(persona, model = %self.model, "Sending AI request");

        match self.call(&request).await {
            Ok((content, tokens_used)) => {
                let elapsed = timer.elapsed();
                metrics::record_ai_request(persona, "success", elapsed);
                tracing::info!(
                    persona,
                    duration_seconds = elapsed.as_secs_f64(),
                    tokens_used = tokens_used,
                    "AI request completed"
                );
                Ok(content)
            }
            Err(err) => {
                metrics::record_ai_request(persona, "error", timer.elapsed());
                tracing::error!(persona, error = %format!("{err:#}"), "AI request failed");
                Err(err)
            }
        }
    }
}

fn extract_message_content(body: &Value) -> Option<&str> {
    body.get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|value| value.as_str())
}

/// Replays `history` (oldest first) as speaker-labelled lines and leaves the turn open
/// for the model.
pub(crate) fn build_context_prompt(history: &[ChatMessage], prompt: &str) -> String {
    let mut context = String::new();
    for message in history {
        context.push_str(message.sender.label());
        context.push_str(": ");
        context.push_str(&message.text);
        context.push('\n');
    }

    context.push_str("User: ");
    context.push_str(prompt);
    context.push_str("\nAI:");
    context
}
