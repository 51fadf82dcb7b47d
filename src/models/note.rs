use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One consultation note under analysis. `transcript` is opaque text from
/// the upstream transcription collaborator; `analyzed` is the idempotency
/// flag checked-and-set when analysis results are committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicalNote {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub transcript: String,
    pub blood_pressure: String,
    pub summary: Option<String>,
    pub analysis_json: Option<String>,
    pub analyzed: bool,
    pub created_at: DateTime<Utc>,
}

impl ClinicalNote {
    pub fn new(patient_id: Uuid, transcript: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id,
            transcript: transcript.to_string(),
            blood_pressure: String::new(),
            summary: None,
            analysis_json: None,
            analyzed: false,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_note_starts_unanalyzed() {
        let note = ClinicalNote::new(Uuid::new_v4(), "Patient reports cough");
        assert!(!note.analyzed);
        assert!(note.summary.is_none());
        assert!(note.analysis_json.is_none());
    }
}
