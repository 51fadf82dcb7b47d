use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::AnalysisStage;

/// Immutable log of one model invocation: the prompt sent and the raw,
/// pre-parse response. Written once per invocation (dummy fallbacks
/// included), never updated or deleted by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub note_id: Uuid,
    pub stage: AnalysisStage,
    pub prompt: String,
    pub response: String,
    pub created_at: DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(note_id: Uuid, stage: AnalysisStage, prompt: &str, response: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            note_id,
            stage,
            prompt: prompt.to_string(),
            response: response.to_string(),
            created_at: Utc::now(),
        }
    }
}
