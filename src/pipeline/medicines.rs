use super::gateway::ModelGateway;
use super::json_extract::extract;
use super::prompt::build_medicine_prompt;
use super::types::{MedicineSuggestion, PatientAttributes, StageOutput, SymptomReport};
use crate::models::AnalysisStage;

/// Run the medicine prediction stage. The prompt embeds the serialized
/// symptom report, patient attributes, and — when provided — a condensed
/// block of the most recent `history_window` prior summaries. A response
/// that is not a JSON array parses to an empty suggestion list.
pub fn predict_medicines(
    gateway: &ModelGateway,
    report: &SymptomReport,
    patient: &PatientAttributes,
    history: &[String],
    history_window: usize,
    confidence_default: f32,
) -> StageOutput<Vec<MedicineSuggestion>> {
    let symptoms_json =
        serde_json::to_string(report).unwrap_or_else(|_| "{\"symptoms\": []}".into());
    let patient_json = serde_json::to_string(patient).unwrap_or_else(|_| "{}".into());
    let history_block = condense_history(history, history_window);

    let prompt = build_medicine_prompt(&symptoms_json, &patient_json, history_block.as_deref());
    let raw_response = gateway.invoke(AnalysisStage::MedicinePrediction, &prompt);

    let value = extract(&raw_response);
    let suggestions = match value.as_array() {
        Some(items) => items
            .iter()
            .filter_map(|item| {
                let name = item.get("name")?.as_str()?.trim();
                if name.is_empty() {
                    return None;
                }
                let field = |key: &str| {
                    item.get(key)
                        .and_then(|v| v.as_str())
                        .unwrap_or("")
                        .to_string()
                };
                let confidence = item
                    .get("confidence")
                    .and_then(|c| c.as_f64())
                    .map(|c| c as f32)
                    .unwrap_or(confidence_default)
                    .clamp(0.0, 1.0);
                Some(MedicineSuggestion {
                    name: name.to_string(),
                    composition: field("composition"),
                    reason: field("reason"),
                    confidence,
                })
            })
            .collect(),
        None => Vec::new(),
    };

    StageOutput {
        value: suggestions,
        raw_response,
    }
}

/// Join the most recent `window` summaries into one bulleted block, or
/// None when there is no usable history.
fn condense_history(history: &[String], window: usize) -> Option<String> {
    let lines: Vec<String> = history
        .iter()
        .filter(|s| !s.trim().is_empty())
        .take(window)
        .map(|s| format!("- {}", s.trim()))
        .collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
