use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::parse_uuid;
use crate::db::DatabaseError;
use crate::models::{AnalysisStage, AuditRecord};

/// Append one audit entry. The table is insert-only: nothing in the crate
/// updates or deletes rows here.
pub fn insert_audit_record(conn: &Connection, record: &AuditRecord) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO llm_audit (id, note_id, stage, prompt, response, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            record.id.to_string(),
            record.note_id.to_string(),
            record.stage.as_str(),
            record.prompt,
            record.response,
            record.created_at,
        ],
    )?;
    Ok(())
}

/// Audit entries for a note in write order (extraction before prediction).
pub fn list_audit_for_note(
    conn: &Connection,
    note_id: &Uuid,
) -> Result<Vec<AuditRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, note_id, stage, prompt, response, created_at
         FROM llm_audit WHERE note_id = ?1 ORDER BY rowid",
    )?;
    let rows = stmt
        .query_map(params![note_id.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, DateTime<Utc>>(5)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut records = Vec::with_capacity(rows.len());
    for (id, note_id, stage, prompt, response, created_at) in rows {
        records.push(AuditRecord {
            id: parse_uuid("llm_audit.id", id)?,
            note_id: parse_uuid("llm_audit.note_id", note_id)?,
            stage: AnalysisStage::from_str(&stage)?,
            prompt,
            response,
            created_at,
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::note::insert_note;
    use crate::db::repository::patient::insert_patient;
    use crate::db::sqlite::open_memory_database;
    use crate::models::{ClinicalNote, Patient};

    fn seeded_note(conn: &Connection) -> ClinicalNote {
        let patient = Patient::new("Asha Rao");
        insert_patient(conn, &patient).unwrap();
        let note = ClinicalNote::new(patient.id, "Patient reports cough");
        insert_note(conn, &note).unwrap();
        note
    }

    #[test]
    fn audit_records_come_back_in_write_order() {
        let conn = open_memory_database().unwrap();
        let note = seeded_note(&conn);

        let extraction = AuditRecord::new(
            note.id,
            AnalysisStage::SymptomExtraction,
            "Patient reports cough",
            r#"{"symptoms": []}"#,
        );
        let prediction = AuditRecord::new(
            note.id,
            AnalysisStage::MedicinePrediction,
            r#"{"symptoms": []}"#,
            "[]",
        );
        insert_audit_record(&conn, &extraction).unwrap();
        insert_audit_record(&conn, &prediction).unwrap();

        let records = list_audit_for_note(&conn, &note.id).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].stage, AnalysisStage::SymptomExtraction);
        assert_eq!(records[1].stage, AnalysisStage::MedicinePrediction);
        assert_eq!(records[1].response, "[]");
    }

    #[test]
    fn audit_for_other_note_not_returned() {
        let conn = open_memory_database().unwrap();
        let note_a = seeded_note(&conn);
        let note_b = seeded_note(&conn);

        let rec = AuditRecord::new(note_a.id, AnalysisStage::SymptomExtraction, "p", "r");
        insert_audit_record(&conn, &rec).unwrap();

        assert_eq!(list_audit_for_note(&conn, &note_a.id).unwrap().len(), 1);
        assert!(list_audit_for_note(&conn, &note_b.id).unwrap().is_empty());
    }
}
