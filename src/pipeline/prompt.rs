/// System message for the symptom extraction backend.
pub const SYMPTOM_SYSTEM_PROMPT: &str = "You extract symptoms as JSON only.";

/// Build the symptom extraction prompt embedding the transcript.
pub fn build_symptom_prompt(transcript: &str) -> String {
    format!(
        r#"You are a medical note analyzer.
Input: a transcribed text generated from a patient's and doctor's audio note.
Return structured JSON ONLY. The JSON must contain the fields "symptoms" and "summary".
{{
  "symptoms": [{{"name": "<symptom>", "confidence": 0.0-1.0}}],
  "summary": "<1-line summary>"
}}
Text: {transcript}"#
    )
}

/// Build the medicine prediction prompt from serialized symptoms, patient
/// attributes, and an optional condensed prior-history block.
pub fn build_medicine_prompt(
    symptoms_json: &str,
    patient_info_json: &str,
    history: Option<&str>,
) -> String {
    let history_block = match history {
        Some(text) => format!("Prior history (most recent first):\n{text}\n"),
        None => String::new(),
    };

    format!(
        r#"You are a clinical assistant suggesting potential medicines based on symptoms.
Input:
Symptoms: {symptoms_json}
Patient Info: {patient_info_json}
{history_block}
Output only a JSON array of medicine suggestions. The array must contain objects with the fields "name", "composition", and "reason".
[
  {{
    "name": "<medicine name>",
    "composition": "<e.g., Paracetamol 500mg>",
    "reason": "<why suggested>",
    "confidence": 0.0-1.0
  }}
]"#
    )
}
