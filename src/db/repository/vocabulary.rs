use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::parse_uuid;
use crate::db::DatabaseError;

/// Get-or-create semantics over the symptom vocabulary: the first writer
/// of a name fixes its spelling (callers canonicalize before calling).
pub fn get_or_create_symptom(conn: &Connection, name: &str) -> Result<Uuid, DatabaseError> {
    if let Some(id) = symptom_id(conn, name)? {
        return Ok(id);
    }
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT OR IGNORE INTO symptoms (id, name) VALUES (?1, ?2)",
        params![id.to_string(), name],
    )?;
    // INSERT OR IGNORE may have lost a race with another writer; re-read.
    match symptom_id(conn, name)? {
        Some(id) => Ok(id),
        None => Err(DatabaseError::NotFound {
            entity_type: "Symptom".into(),
            id: name.into(),
        }),
    }
}

fn symptom_id(conn: &Connection, name: &str) -> Result<Option<Uuid>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id FROM symptoms WHERE name = ?1",
            params![name],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    row.map(|id| parse_uuid("symptoms.id", id)).transpose()
}

pub fn insert_medicine(
    conn: &Connection,
    name: &str,
    description: &str,
) -> Result<Uuid, DatabaseError> {
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO medicines (id, name, description) VALUES (?1, ?2, ?3)",
        params![id.to_string(), name, description],
    )?;
    Ok(id)
}

pub fn medicine_id(conn: &Connection, name: &str) -> Result<Option<Uuid>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id FROM medicines WHERE name = ?1",
            params![name],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    row.map(|id| parse_uuid("medicines.id", id)).transpose()
}

/// Vocabulary snapshot in insertion order. Reconciliation breaks similarity
/// ties by first-encountered entry, so the order here is load-bearing.
pub fn list_medicine_names(conn: &Connection) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT name FROM medicines ORDER BY rowid")?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn list_symptom_names(conn: &Connection) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT name FROM symptoms ORDER BY rowid")?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    #[test]
    fn get_or_create_symptom_reuses_existing() {
        let conn = open_memory_database().unwrap();
        let first = get_or_create_symptom(&conn, "Cough").unwrap();
        let second = get_or_create_symptom(&conn, "Cough").unwrap();
        assert_eq!(first, second);
        assert_eq!(list_symptom_names(&conn).unwrap(), vec!["Cough"]);
    }

    #[test]
    fn symptom_names_are_case_distinct() {
        // Canonicalization happens upstream; the store itself is exact.
        let conn = open_memory_database().unwrap();
        let upper = get_or_create_symptom(&conn, "Cough").unwrap();
        let lower = get_or_create_symptom(&conn, "cough").unwrap();
        assert_ne!(upper, lower);
    }

    #[test]
    fn medicine_names_keep_insertion_order() {
        let conn = open_memory_database().unwrap();
        insert_medicine(&conn, "Paracetamol", "Analgesic and antipyretic").unwrap();
        insert_medicine(&conn, "Ibuprofen", "NSAID").unwrap();
        insert_medicine(&conn, "Amoxicillin", "").unwrap();
        assert_eq!(
            list_medicine_names(&conn).unwrap(),
            vec!["Paracetamol", "Ibuprofen", "Amoxicillin"]
        );
    }

    #[test]
    fn duplicate_medicine_name_rejected() {
        let conn = open_memory_database().unwrap();
        insert_medicine(&conn, "Paracetamol", "").unwrap();
        let result = insert_medicine(&conn, "Paracetamol", "");
        assert!(matches!(result, Err(DatabaseError::Sqlite(_))));
    }

    #[test]
    fn medicine_id_lookup() {
        let conn = open_memory_database().unwrap();
        let id = insert_medicine(&conn, "Paracetamol", "").unwrap();
        assert_eq!(medicine_id(&conn, "Paracetamol").unwrap(), Some(id));
        assert_eq!(medicine_id(&conn, "Ibuprofen").unwrap(), None);
    }
}
