use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::parse_uuid;
use crate::db::DatabaseError;
use crate::models::Patient;

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, name, phone, age, gender, blood_group, weight, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            patient.id.to_string(),
            patient.name,
            patient.phone,
            patient.age,
            patient.gender,
            patient.blood_group,
            patient.weight,
            patient.created_at,
        ],
    )?;
    Ok(())
}

pub fn get_patient(conn: &Connection, id: &Uuid) -> Result<Option<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, phone, age, gender, blood_group, weight, created_at
         FROM patients WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<u32>>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, Option<f64>>(6)?,
            row.get::<_, DateTime<Utc>>(7)?,
        ))
    });

    match result {
        Ok((id, name, phone, age, gender, blood_group, weight, created_at)) => {
            Ok(Some(Patient {
                id: parse_uuid("patients.id", id)?,
                name,
                phone,
                age,
                gender,
                blood_group,
                weight,
                created_at,
            }))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    #[test]
    fn insert_and_get_patient() {
        let conn = open_memory_database().unwrap();
        let mut patient = Patient::new("Asha Rao");
        patient.age = Some(42);
        patient.gender = "female".into();
        patient.weight = Some(61.5);
        insert_patient(&conn, &patient).unwrap();

        let loaded = get_patient(&conn, &patient.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Asha Rao");
        assert_eq!(loaded.age, Some(42));
        assert!((loaded.weight.unwrap() - 61.5).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_patient_returns_none() {
        let conn = open_memory_database().unwrap();
        assert!(get_patient(&conn, &Uuid::new_v4()).unwrap().is_none());
    }
}
