use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::parse_uuid;
use crate::db::DatabaseError;
use crate::models::ClinicalNote;

pub fn insert_note(conn: &Connection, note: &ClinicalNote) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO clinical_notes (id, patient_id, transcript, blood_pressure, summary,
         analysis_json, analyzed, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            note.id.to_string(),
            note.patient_id.to_string(),
            note.transcript,
            note.blood_pressure,
            note.summary,
            note.analysis_json,
            note.analyzed as i32,
            note.created_at,
        ],
    )?;
    Ok(())
}

pub fn get_note(conn: &Connection, id: &Uuid) -> Result<Option<ClinicalNote>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, transcript, blood_pressure, summary, analysis_json,
         analyzed, created_at
         FROM clinical_notes WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, Option<String>>(4)?,
            row.get::<_, Option<String>>(5)?,
            row.get::<_, i32>(6)?,
            row.get::<_, DateTime<Utc>>(7)?,
        ))
    });

    match result {
        Ok((id, patient_id, transcript, blood_pressure, summary, analysis_json, analyzed, created_at)) => {
            Ok(Some(ClinicalNote {
                id: parse_uuid("clinical_notes.id", id)?,
                patient_id: parse_uuid("clinical_notes.patient_id", patient_id)?,
                transcript,
                blood_pressure,
                summary,
                analysis_json,
                analyzed: analyzed != 0,
                created_at,
            }))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Check-and-set the analyzed flag. Returns true if this call flipped the
/// flag, false if the note was already analyzed (a concurrent run won).
pub fn mark_analyzed(conn: &Connection, note_id: &Uuid) -> Result<bool, DatabaseError> {
    let updated = conn.execute(
        "UPDATE clinical_notes SET analyzed = 1 WHERE id = ?1 AND analyzed = 0",
        params![note_id.to_string()],
    )?;
    Ok(updated == 1)
}

/// Write the one-line summary and the raw analysis JSON onto the note.
pub fn store_analysis(
    conn: &Connection,
    note_id: &Uuid,
    summary: &str,
    analysis_json: &str,
) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE clinical_notes SET summary = ?2, analysis_json = ?3 WHERE id = ?1",
        params![note_id.to_string(), summary, analysis_json],
    )?;
    Ok(())
}

pub fn attach_symptom(
    conn: &Connection,
    note_id: &Uuid,
    symptom_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT OR IGNORE INTO note_symptoms (note_id, symptom_id) VALUES (?1, ?2)",
        params![note_id.to_string(), symptom_id.to_string()],
    )?;
    Ok(())
}

pub fn attach_medicine(
    conn: &Connection,
    note_id: &Uuid,
    medicine_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT OR IGNORE INTO note_medicines (note_id, medicine_id) VALUES (?1, ?2)",
        params![note_id.to_string(), medicine_id.to_string()],
    )?;
    Ok(())
}

pub fn note_symptom_names(conn: &Connection, note_id: &Uuid) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT s.name FROM symptoms s
         JOIN note_symptoms ns ON ns.symptom_id = s.id
         WHERE ns.note_id = ?1 ORDER BY s.name",
    )?;
    let rows = stmt
        .query_map(params![note_id.to_string()], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn note_medicine_names(conn: &Connection, note_id: &Uuid) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT m.name FROM medicines m
         JOIN note_medicines nm ON nm.medicine_id = m.id
         WHERE nm.note_id = ?1 ORDER BY m.name",
    )?;
    let rows = stmt
        .query_map(params![note_id.to_string()], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Summaries of previously analyzed notes for the same patient, most
/// recent first. Patient identity is matched by name, case-insensitively —
/// the only identity key the upstream forms provide.
pub fn patient_history_summaries(
    conn: &Connection,
    patient_name: &str,
    limit: usize,
) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT n.summary FROM clinical_notes n
         JOIN patients p ON p.id = n.patient_id
         WHERE LOWER(p.name) = LOWER(?1)
           AND n.analyzed = 1
           AND n.summary IS NOT NULL AND n.summary != ''
         ORDER BY n.created_at DESC
         LIMIT ?2",
    )?;
    let rows = stmt
        .query_map(params![patient_name, limit as i64], |row| {
            row.get::<_, String>(0)
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
