use super::backends::{GeminiBackend, OpenAiBackend};
use super::prompt::SYMPTOM_SYSTEM_PROMPT;
use super::types::TextBackend;
use crate::config::AnalysisConfig;
use crate::models::AnalysisStage;

/// Fixed payload substituted when the symptom backend is unconfigured or
/// errors. Valid JSON of the stage's expected shape, so downstream parsing
/// always has something to chew on.
pub const SYMPTOM_FALLBACK_PAYLOAD: &str = r#"{"symptoms": [{"name": "Dummy Cough", "confidence": 0.8}, {"name": "Dummy Fever", "confidence": 0.9}], "summary": "Symptom backend unavailable; placeholder data."}"#;

/// Fixed payload substituted when the medicine backend is unconfigured or
/// errors.
pub const MEDICINE_FALLBACK_PAYLOAD: &str = r#"[{"name": "Dummy Paracetamol", "composition": "500mg", "reason": "Placeholder suggestion; medicine backend unavailable.", "confidence": 0.99}, {"name": "Dummy Antacid", "composition": "250mg", "reason": "Placeholder suggestion; medicine backend unavailable.", "confidence": 0.7}]"#;

/// Uniform entry point to the per-stage generative backends. Each stage is
/// bound to at most one backend; a missing binding or any transport/service
/// error degrades to that stage's fixed dummy payload. Transient failures
/// never cross this boundary.
///
/// The gateway is constructed explicitly and passed in by the caller — no
/// process-global clients — and it does not write audit records; the
/// orchestrator owns those.
pub struct ModelGateway {
    symptom_backend: Option<Box<dyn TextBackend>>,
    medicine_backend: Option<Box<dyn TextBackend>>,
}

impl ModelGateway {
    pub fn new(
        symptom_backend: Option<Box<dyn TextBackend>>,
        medicine_backend: Option<Box<dyn TextBackend>>,
    ) -> Self {
        Self {
            symptom_backend,
            medicine_backend,
        }
    }

    /// Gateway with no backends: every invocation returns dummy payloads.
    pub fn unconfigured() -> Self {
        Self::new(None, None)
    }

    /// Bind backends according to credential presence in the config.
    /// An absent key leaves that stage in dummy-fallback mode.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        let symptom_backend = match &config.openai_api_key {
            Some(key) => Some(Box::new(OpenAiBackend::new(
                key,
                &config.symptom_model,
                SYMPTOM_SYSTEM_PROMPT,
                config.max_output_tokens,
                config.http_timeout_secs,
            )) as Box<dyn TextBackend>),
            None => {
                tracing::warn!("no OpenAI credential; symptom extraction will use dummy data");
                None
            }
        };

        let medicine_backend = match &config.gemini_api_key {
            Some(key) => Some(Box::new(GeminiBackend::new(
                key,
                &config.medicine_model,
                config.max_output_tokens,
                config.http_timeout_secs,
            )) as Box<dyn TextBackend>),
            None => {
                tracing::warn!("no Gemini credential; medicine prediction will use dummy data");
                None
            }
        };

        Self::new(symptom_backend, medicine_backend)
    }

    /// Send a prompt to the stage's backend. Always returns a string:
    /// transient errors are logged and replaced by the stage's fallback.
    pub fn invoke(&self, stage: AnalysisStage, prompt: &str) -> String {
        let backend = match stage {
            AnalysisStage::SymptomExtraction => &self.symptom_backend,
            AnalysisStage::MedicinePrediction => &self.medicine_backend,
        };

        let Some(backend) = backend else {
            tracing::warn!(stage = stage.as_str(), "backend unconfigured, using fallback");
            return fallback_payload(stage).to_string();
        };

        match backend.generate(prompt) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(stage = stage.as_str(), error = %e, "backend call failed, using fallback");
                fallback_payload(stage).to_string()
            }
        }
    }
}

fn fallback_payload(stage: AnalysisStage) -> &'static str {
    match stage {
        AnalysisStage::SymptomExtraction => SYMPTOM_FALLBACK_PAYLOAD,
        AnalysisStage::MedicinePrediction => MEDICINE_FALLBACK_PAYLOAD,
    }
}
