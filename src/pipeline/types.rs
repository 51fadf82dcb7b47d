use serde::{Deserialize, Serialize};

use super::BackendError;

/// One extracted symptom with the model's confidence in it.
/// `name` is canonical: first letter uppercase, remainder lowercase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomObservation {
    pub name: String,
    pub confidence: f32,
}

/// Output of the symptom extraction stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymptomReport {
    pub symptoms: Vec<SymptomObservation>,
    pub summary: String,
}

/// One candidate medicine from the prediction stage. Not deduplicated;
/// mapping onto the reference vocabulary is reconciliation's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicineSuggestion {
    pub name: String,
    pub composition: String,
    pub reason: String,
    pub confidence: f32,
}

/// A suggested medicine name resolved against the reference vocabulary.
/// `matched_reference` is None when nothing cleared the similarity floor;
/// the pipeline never invents vocabulary entries from suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledMatch {
    pub suggested_name: String,
    pub matched_reference: Option<String>,
}

/// Everything one orchestrator run hands back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub symptoms: Vec<SymptomObservation>,
    pub summary: String,
    pub medicines: Vec<MedicineSuggestion>,
    pub reconciliation: Vec<ReconciledMatch>,
}

/// A stage's parsed value together with the raw model payload, which the
/// orchestrator persists verbatim as the audit record's response.
#[derive(Debug, Clone)]
pub struct StageOutput<T> {
    pub value: T,
    pub raw_response: String,
}

/// Patient attributes embedded into the medicine prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientAttributes {
    pub name: String,
    pub age: Option<u32>,
    pub gender: String,
    pub weight: Option<f64>,
}

/// One generative-text backend (allows mocking).
pub trait TextBackend: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, BackendError>;
}
