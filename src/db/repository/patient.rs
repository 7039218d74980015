use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::{Patient, PatientFields};

use super::{now_timestamp, parse_timestamp};

/// Field-level validation shared by create and update.
fn validate_fields(fields: &PatientFields) -> Result<(), DatabaseError> {
    let mut bad = Vec::new();
    if fields.name.trim().is_empty() {
        bad.push("name".to_string());
    }
    if fields.age < 0 {
        bad.push("age".to_string());
    }
    if bad.is_empty() {
        Ok(())
    } else {
        Err(DatabaseError::Validation { fields: bad })
    }
}

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<(Patient, String)> {
    Ok((
        Patient {
            id: row.get(0)?,
            doctor_id: row.get(1)?,
            name: row.get(2)?,
            age: row.get(3)?,
            gender: row.get(4)?,
            contact: row.get(5)?,
            diagnosis: row.get(6)?,
            icd_code: row.get(7)?,
            notes: row.get(8)?,
            // Placeholder, replaced after timestamp parsing below.
            date_created: chrono::NaiveDateTime::default(),
        },
        row.get::<_, String>(9)?,
    ))
}

fn finish(pair: (Patient, String)) -> Result<Patient, DatabaseError> {
    let (mut patient, created) = pair;
    patient.date_created = parse_timestamp(&created)?;
    Ok(patient)
}

const PATIENT_COLUMNS: &str =
    "id, doctor_id, name, age, gender, contact, diagnosis, icd_code, notes, date_created";

/// Create a patient record owned by the given doctor.
pub fn create_patient(
    conn: &Connection,
    doctor_id: i64,
    fields: &PatientFields,
) -> Result<Patient, DatabaseError> {
    validate_fields(fields)?;
    let created = now_timestamp();

    conn.execute(
        "INSERT INTO patients (doctor_id, name, age, gender, contact, diagnosis, icd_code, notes, date_created)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            doctor_id,
            fields.name,
            fields.age,
            fields.gender,
            fields.contact,
            fields.diagnosis,
            fields.icd_code,
            fields.notes,
            created,
        ],
    )?;

    let id = conn.last_insert_rowid();
    tracing::debug!(patient_id = id, doctor_id, "Patient record created");
    get_patient(conn, id)
}

pub fn get_patient(conn: &Connection, id: i64) -> Result<Patient, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1"),
            params![id],
            patient_from_row,
        )
        .optional()?;

    let pair = row.ok_or_else(|| DatabaseError::NotFound {
        entity_type: "patient".into(),
        id: id.to_string(),
    })?;
    finish(pair)
}

/// All patients for a doctor, newest first.
pub fn list_patients(conn: &Connection, doctor_id: i64) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients
         WHERE doctor_id = ?1 ORDER BY date_created DESC, id DESC"
    ))?;
    let rows = stmt.query_map(params![doctor_id], patient_from_row)?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(finish(row?)?);
    }
    Ok(patients)
}

/// Replace the editable fields of a patient. Re-validates before writing.
pub fn update_patient(
    conn: &Connection,
    id: i64,
    fields: &PatientFields,
) -> Result<(), DatabaseError> {
    validate_fields(fields)?;

    let changed = conn.execute(
        "UPDATE patients
         SET name = ?1, age = ?2, gender = ?3, contact = ?4,
             diagnosis = ?5, icd_code = ?6, notes = ?7
         WHERE id = ?8",
        params![
            fields.name,
            fields.age,
            fields.gender,
            fields.contact,
            fields.diagnosis,
            fields.icd_code,
            fields.notes,
            id,
        ],
    )?;

    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "patient".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Delete a patient and every clinical note attached to them.
///
/// The store does not auto-cascade, so the note deletion is explicit and
/// runs in the same transaction as the patient row removal.
pub fn delete_patient(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM clinical_notes WHERE patient_id = ?1", params![id])?;
    let changed = tx.execute("DELETE FROM patients WHERE id = ?1", params![id])?;
    tx.commit()?;

    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "patient".into(),
            id: id.to_string(),
        });
    }
    tracing::info!(patient_id = id, "Patient and associated notes deleted");
    Ok(())
}

/// Case-insensitive substring search over name, diagnosis and ICD code,
/// scoped to one doctor's patients.
pub fn search_patients(
    conn: &Connection,
    doctor_id: i64,
    query: &str,
) -> Result<Vec<Patient>, DatabaseError> {
    let term = format!("%{}%", query.to_lowercase());
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients
         WHERE doctor_id = ?1 AND (
             LOWER(name) LIKE ?2 OR
             LOWER(diagnosis) LIKE ?2 OR
             LOWER(icd_code) LIKE ?2
         )
         ORDER BY date_created DESC, id DESC"
    ))?;
    let rows = stmt.query_map(params![doctor_id, term], patient_from_row)?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(finish(row?)?);
    }
    Ok(patients)
}
