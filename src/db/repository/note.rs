use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::{ClinicalNote, NoteType};

use super::{now_timestamp, parse_timestamp};

/// Codes are stored as a comma-joined TEXT column; order is preserved.
fn join_codes(codes: &[String]) -> String {
    codes.join(",")
}

fn split_codes(stored: &str) -> Vec<String> {
    stored
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

type NoteRow = (i64, i64, i64, String, String, String, String);

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<NoteRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn finish(row: NoteRow) -> Result<ClinicalNote, DatabaseError> {
    let (id, patient_id, doctor_id, note_type, content, codes, created) = row;
    Ok(ClinicalNote {
        id,
        patient_id,
        doctor_id,
        note_type: NoteType::from_str(&note_type)?,
        content,
        icd_codes: split_codes(&codes),
        date_created: parse_timestamp(&created)?,
    })
}

/// Append a clinical note for a patient. Notes are never updated in place.
pub fn create_note(
    conn: &Connection,
    patient_id: i64,
    doctor_id: i64,
    note_type: NoteType,
    content: &str,
    codes: &[String],
) -> Result<ClinicalNote, DatabaseError> {
    let created = now_timestamp();
    conn.execute(
        "INSERT INTO clinical_notes (patient_id, doctor_id, note_type, content, icd_codes, date_created)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            patient_id,
            doctor_id,
            note_type.as_str(),
            content,
            join_codes(codes),
            created,
        ],
    )?;

    let id = conn.last_insert_rowid();
    tracing::debug!(note_id = id, patient_id, note_type = %note_type, "Clinical note stored");
    get_note(conn, id)
}

pub fn get_note(conn: &Connection, id: i64) -> Result<ClinicalNote, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, patient_id, doctor_id, note_type, content, icd_codes, date_created
             FROM clinical_notes WHERE id = ?1",
            params![id],
            note_from_row,
        )
        .optional()?;

    let row = row.ok_or_else(|| DatabaseError::NotFound {
        entity_type: "clinical_note".into(),
        id: id.to_string(),
    })?;
    finish(row)
}

/// All notes for a patient, newest first.
pub fn list_notes_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<ClinicalNote>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, doctor_id, note_type, content, icd_codes, date_created
         FROM clinical_notes WHERE patient_id = ?1
         ORDER BY date_created DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![patient_id], note_from_row)?;

    let mut notes = Vec::new();
    for row in rows {
        notes.push(finish(row?)?);
    }
    Ok(notes)
}
