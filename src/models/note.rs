use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::NoteType;

/// A stored clinical note. Notes are append-only: created by the generation
/// pipeline or typed manually, deleted only through patient deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicalNote {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub note_type: NoteType,
    pub content: String,
    /// Associated ICD-10 codes, in the order they were attached. May be empty.
    pub icd_codes: Vec<String>,
    pub date_created: NaiveDateTime,
}
