use super::gateway::ModelGateway;
use super::json_extract::extract;
use super::prompt::build_symptom_prompt;
use super::types::{StageOutput, SymptomObservation, SymptomReport};
use crate::models::AnalysisStage;

/// Run the symptom extraction stage: prompt → gateway → tolerant parse →
/// name canonicalization. Total extraction failure yields an empty report,
/// not an error, so the orchestrator can proceed (and audit the attempt).
pub fn extract_symptoms(
    gateway: &ModelGateway,
    transcript: &str,
    confidence_default: f32,
) -> StageOutput<SymptomReport> {
    let prompt = build_symptom_prompt(transcript);
    let raw_response = gateway.invoke(AnalysisStage::SymptomExtraction, &prompt);
    let value = extract(&raw_response);

    let symptoms = value
        .get("symptoms")
        .and_then(|s| s.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let name = item.get("name")?.as_str()?.trim();
                    if name.is_empty() {
                        return None;
                    }
                    let confidence = item
                        .get("confidence")
                        .and_then(|c| c.as_f64())
                        .map(|c| c as f32)
                        .unwrap_or(confidence_default)
                        .clamp(0.0, 1.0);
                    Some(SymptomObservation {
                        name: canonicalize_symptom(name),
                        confidence,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let summary = value
        .get("summary")
        .and_then(|s| s.as_str())
        .unwrap_or("")
        .to_string();

    StageOutput {
        value: SymptomReport { symptoms, summary },
        raw_response,
    }
}

/// Canonical symptom spelling: first letter uppercase, remainder lowercase.
/// Repeated extractions of "dry cough" / "Dry Cough" / "DRY COUGH" all
/// land on the same vocabulary entry downstream.
pub fn canonicalize_symptom(name: &str) -> String {
    let mut chars = name.trim().chars();
    match chars.next() {
        Some(first) => {
            first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::backends::MockBackend;

    fn gateway_with(response: &str) -> ModelGateway {
        ModelGateway::new(Some(Box::new(MockBackend::new(response))), None)
    }

    #[test]
    fn canonicalization_rules() {
        assert_eq!(canonicalize_symptom("cough"), "Cough");
        assert_eq!(canonicalize_symptom("DRY COUGH"), "Dry cough");
        assert_eq!(canonicalize_symptom("  fever  "), "Fever");
        assert_eq!(canonicalize_symptom(""), "");
    }

    #[test]
    fn parses_symptoms_from_prose_wrapped_json() {
        let gateway = gateway_with(
            "Here you go:\n{\"symptoms\": [{\"name\": \"dry cough\", \"confidence\": 0.85}, \
             {\"name\": \"FEVER\", \"confidence\": 0.9}], \"summary\": \"Likely viral infection\"}",
        );
        let output = extract_symptoms(&gateway, "Patient reports cough and fever", 0.5);

        let report = output.value;
        assert_eq!(report.symptoms.len(), 2);
        assert_eq!(report.symptoms[0].name, "Dry cough");
        assert!((report.symptoms[0].confidence - 0.85).abs() < f32::EPSILON);
        assert_eq!(report.symptoms[1].name, "Fever");
        assert_eq!(report.summary, "Likely viral infection");
        assert!(output.raw_response.contains("Here you go"));
    }

    #[test]
    fn missing_confidence_gets_neutral_default() {
        let gateway = gateway_with(r#"{"symptoms": [{"name": "cough"}], "summary": ""}"#);
        let output = extract_symptoms(&gateway, "transcript", 0.5);
        assert!((output.value.symptoms[0].confidence - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn out_of_range_confidence_clamped() {
        let gateway = gateway_with(
            r#"{"symptoms": [{"name": "cough", "confidence": 1.7}, {"name": "fever", "confidence": -0.2}], "summary": ""}"#,
        );
        let output = extract_symptoms(&gateway, "transcript", 0.5);
        assert!((output.value.symptoms[0].confidence - 1.0).abs() < f32::EPSILON);
        assert!((output.value.symptoms[1].confidence - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn items_without_names_are_skipped() {
        let gateway = gateway_with(
            r#"{"symptoms": [{"confidence": 0.8}, {"name": "", "confidence": 0.9}, {"name": "cough"}], "summary": ""}"#,
        );
        let output = extract_symptoms(&gateway, "transcript", 0.5);
        assert_eq!(output.value.symptoms.len(), 1);
        assert_eq!(output.value.symptoms[0].name, "Cough");
    }

    #[test]
    fn unparseable_response_yields_empty_report() {
        let gateway = gateway_with("the model rambled with no json at all");
        let output = extract_symptoms(&gateway, "transcript", 0.5);
        assert!(output.value.symptoms.is_empty());
        assert!(output.value.summary.is_empty());
        // Raw response still carried for the audit trail.
        assert_eq!(output.raw_response, "the model rambled with no json at all");
    }

    #[test]
    fn duplicate_symptoms_are_preserved() {
        // Dedup happens at the vocabulary layer, not here.
        let gateway = gateway_with(
            r#"{"symptoms": [{"name": "cough", "confidence": 0.8}, {"name": "Cough", "confidence": 0.7}], "summary": ""}"#,
        );
        let output = extract_symptoms(&gateway, "transcript", 0.5);
        assert_eq!(output.value.symptoms.len(), 2);
        assert_eq!(output.value.symptoms[0].name, output.value.symptoms[1].name);
    }
}
