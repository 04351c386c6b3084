use std::sync::OnceLock;
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::Settings;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled || PROM_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROM_HANDLE.set(handle);
    Ok(())
}

pub(crate) fn render() -> Option<String> {
    PROM_HANDLE.get().map(|handle| handle.render())
}

pub(crate) fn record_ai_request(persona: &'static str, outcome: &'static str, elapsed: Duration) {
    metrics::counter!("ai_requests_total", "persona" => persona, "outcome" => outcome).increment(1);
    metrics::histogram!("ai_request_duration_seconds", "persona" => persona)
        .record(elapsed.as_secs_f64());
}

pub(crate) fn record_ai_parse_failure(persona: &'static str) {
    metrics::counter!("ai_parse_failures_total", "persona" => persona).increment(1);
}

pub(crate) fn record_quiz_submission(correct: usize, total: usize) {
    metrics::counter!("quiz_submissions_total").increment(1);
    if total > 0 {
        metrics::histogram!("quiz_score_ratio").record(correct as f64 / total as f64);
    }
}
