use serde::{Deserialize, Serialize};

use crate::db::DatabaseError;

/// One discrete LLM-backed transformation within the analysis pipeline.
/// Each variant is bound 1:1 to a configured model backend, and the wire
/// string is what gets persisted on audit records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    SymptomExtraction,
    MedicinePrediction,
}

impl AnalysisStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SymptomExtraction => "symptom_extraction",
            Self::MedicinePrediction => "medicine_prediction",
        }
    }
}

impl std::str::FromStr for AnalysisStage {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "symptom_extraction" => Ok(Self::SymptomExtraction),
            "medicine_prediction" => Ok(Self::MedicinePrediction),
            _ => Err(DatabaseError::InvalidEnum {
                field: "AnalysisStage".into(),
                value: s.into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn stage_round_trips_through_str() {
        for stage in [AnalysisStage::SymptomExtraction, AnalysisStage::MedicinePrediction] {
            assert_eq!(AnalysisStage::from_str(stage.as_str()).unwrap(), stage);
        }
    }

    #[test]
    fn unknown_stage_rejected() {
        let result = AnalysisStage::from_str("transcription");
        assert!(matches!(result, Err(DatabaseError::InvalidEnum { .. })));
    }

    #[test]
    fn stage_serializes_snake_case() {
        let json = serde_json::to_string(&AnalysisStage::SymptomExtraction).unwrap();
        assert_eq!(json, "\"symptom_extraction\"");
    }
}
