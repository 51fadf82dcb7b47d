use rusqlite::Connection;
use uuid::Uuid;

use super::gateway::ModelGateway;
use super::medicines::predict_medicines;
use super::reconcile::reconcile;
use super::symptoms::extract_symptoms;
use super::types::{AnalysisResult, PatientAttributes};
use super::AnalysisError;
use crate::config::AnalysisConfig;
use crate::db::repository::{
    attach_medicine, attach_symptom, get_note, get_or_create_symptom, get_patient,
    insert_audit_record, list_medicine_names, mark_analyzed, medicine_id,
    patient_history_summaries, store_analysis,
};
use crate::db::DatabaseError;
use crate::models::{AnalysisStage, AuditRecord};

/// Sequences the analysis stages over one clinical note:
/// extract → audit → predict → audit → reconcile → commit.
///
/// Every model invocation leaves exactly one audit record, written
/// immediately — audit rows from a run that later fails are kept, since
/// they document what was attempted. The symptom/medicine associations,
/// summary, and analyzed flag land in a single transaction at the end, so
/// a persistence failure commits nothing partial.
pub struct NoteAnalyzer {
    gateway: ModelGateway,
    config: AnalysisConfig,
}

impl NoteAnalyzer {
    pub fn new(gateway: ModelGateway, config: AnalysisConfig) -> Self {
        Self { gateway, config }
    }

    pub fn analyze(
        &self,
        conn: &mut Connection,
        note_id: &Uuid,
    ) -> Result<AnalysisResult, AnalysisError> {
        let _span = tracing::info_span!("analyze_note", note_id = %note_id).entered();

        let note = get_note(conn, note_id)?.ok_or(AnalysisError::NoteNotFound(*note_id))?;
        if note.transcript.trim().is_empty() {
            return Err(AnalysisError::EmptyTranscript(*note_id));
        }
        if note.analyzed {
            return Err(AnalysisError::AlreadyAnalyzed(*note_id));
        }

        let patient = get_patient(conn, &note.patient_id)?.ok_or_else(|| {
            DatabaseError::NotFound {
                entity_type: "Patient".into(),
                id: note.patient_id.to_string(),
            }
        })?;
        let attributes = PatientAttributes {
            name: patient.name,
            age: patient.age,
            gender: patient.gender,
            weight: patient.weight,
        };

        // Stage 1 — symptom extraction, audited even when the extractor
        // came back empty.
        let extraction =
            extract_symptoms(&self.gateway, &note.transcript, self.config.confidence_default);
        insert_audit_record(
            conn,
            &AuditRecord::new(
                note.id,
                AnalysisStage::SymptomExtraction,
                &note.transcript,
                &extraction.raw_response,
            ),
        )?;
        let report = extraction.value;
        tracing::info!(symptoms = report.symptoms.len(), "symptom extraction done");

        // Stage 2 — medicine prediction, enriched with prior summaries for
        // the same patient name.
        let history =
            patient_history_summaries(conn, &attributes.name, self.config.history_window)?;
        let prediction = predict_medicines(
            &self.gateway,
            &report,
            &attributes,
            &history,
            self.config.history_window,
            self.config.confidence_default,
        );
        let report_json = serde_json::to_string(&report).unwrap_or_default();
        insert_audit_record(
            conn,
            &AuditRecord::new(
                note.id,
                AnalysisStage::MedicinePrediction,
                &report_json,
                &prediction.raw_response,
            ),
        )?;
        let medicines = prediction.value;
        tracing::info!(suggestions = medicines.len(), "medicine prediction done");

        // Stage 3 — reconcile against the current vocabulary snapshot.
        let vocabulary = list_medicine_names(conn)?;
        let suggested: Vec<String> = medicines.iter().map(|m| m.name.clone()).collect();
        let reconciliation =
            reconcile(&suggested, &vocabulary, self.config.similarity_threshold);

        let result = AnalysisResult {
            symptoms: report.symptoms,
            summary: report.summary,
            medicines,
            reconciliation,
        };

        // Step 4 — all-or-nothing association writes.
        let committed = commit_analysis(conn, note_id, &result)?;
        if !committed {
            tracing::warn!(
                note_id = %note_id,
                "note was analyzed concurrently; association writes skipped"
            );
        }

        Ok(result)
    }
}

/// Commit the analysis in one transaction. The analyzed flag is
/// re-checked-and-set inside the transaction; returns false (committing
/// nothing) when a concurrent run already holds it. Matched medicines are
/// linked; unmatched suggestions are not registered into the vocabulary.
fn commit_analysis(
    conn: &mut Connection,
    note_id: &Uuid,
    result: &AnalysisResult,
) -> Result<bool, DatabaseError> {
    let tx = conn.transaction()?;

    if !mark_analyzed(&tx, note_id)? {
        return Ok(false);
    }

    for observation in &result.symptoms {
        let symptom_id = get_or_create_symptom(&tx, &observation.name)?;
        attach_symptom(&tx, note_id, &symptom_id)?;
    }

    for matched in &result.reconciliation {
        if let Some(reference) = &matched.matched_reference {
            if let Some(id) = medicine_id(&tx, reference)? {
                attach_medicine(&tx, note_id, &id)?;
            }
        }
    }

    let analysis_json = serde_json::to_string(result).unwrap_or_default();
    store_analysis(&tx, note_id, &result.summary, &analysis_json)?;

    tx.commit()?;
    Ok(true)
}
