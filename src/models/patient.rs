use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A patient record, owned by exactly one doctor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub doctor_id: i64,
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub contact: String,
    pub diagnosis: String,
    pub icd_code: String,
    pub notes: String,
    pub date_created: NaiveDateTime,
}

/// Editable patient fields, as entered in the patient form.
///
/// Validated by the repository before any insert or update: `name` must be
/// non-empty and `age` non-negative.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientFields {
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub contact: String,
    pub diagnosis: String,
    pub icd_code: String,
    pub notes: String,
}

impl Patient {
    /// Snapshot of the editable fields, convenient for round-tripping a
    /// record through `update_patient`.
    pub fn fields(&self) -> PatientFields {
        PatientFields {
            name: self.name.clone(),
            age: self.age,
            gender: self.gender.clone(),
            contact: self.contact.clone(),
            diagnosis: self.diagnosis.clone(),
            icd_code: self.icd_code.clone(),
            notes: self.notes.clone(),
        }
    }
}
