use regex::Regex;

use crate::models::{ClinicalNote, Doctor, NoteType, Patient};

const LINE_WIDTH: usize = 70;

fn center(text: &str) -> String {
    if text.len() >= LINE_WIDTH {
        return text.to_string();
    }
    let pad = (LINE_WIDTH - text.len()) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

/// Render a note into its canonical display form: header block, body,
/// signature block. Deterministic: all dates come from the note's own
/// creation timestamp.
pub fn format_note(
    note: &ClinicalNote,
    patient: &Patient,
    doctor: &Doctor,
    clinic_name: &str,
) -> String {
    let mut lines: Vec<String> = Vec::new();
    let rule = "=".repeat(LINE_WIDTH);
    let thin = "-".repeat(LINE_WIDTH);

    lines.push(rule.clone());
    lines.push(center(clinic_name));
    lines.push(center(note.note_type.title()));
    lines.push(rule);
    lines.push(String::new());

    lines.push(format!("Date: {}", note.date_created.format("%Y-%m-%d")));
    lines.push(format!("Time: {}", note.date_created.format("%H:%M:%S")));
    lines.push(String::new());

    lines.push("PATIENT INFORMATION:".into());
    lines.push(format!("Name: {}", patient.name));
    lines.push(format!("Age: {} years", patient.age));
    if !patient.gender.is_empty() {
        lines.push(format!("Gender: {}", patient.gender));
    }
    if !patient.contact.is_empty() {
        lines.push(format!("Contact: {}", patient.contact));
    }
    lines.push(String::new());

    lines.push("PROVIDER INFORMATION:".into());
    lines.push(format!("Doctor: Dr. {}", doctor.name));
    lines.push(format!("Email: {}", doctor.email));
    lines.push(String::new());

    if !note.icd_codes.is_empty() {
        lines.push(format!("ICD-10 Codes: {}", note.icd_codes.join(", ")));
        lines.push(String::new());
    }

    lines.push(thin.clone());
    lines.push(String::new());
    lines.push(clean_note(&note.content));
    lines.push(String::new());
    lines.push(thin.clone());
    lines.push("Electronically signed by:".into());
    lines.push(format!("Dr. {}", doctor.name));
    lines.push(format!(
        "Date: {}",
        note.date_created.format("%Y-%m-%d %H:%M:%S")
    ));
    lines.push(thin);

    lines.join("\n")
}

/// Normalise note whitespace: collapse runs of blank lines, trim the ends.
pub fn clean_note(content: &str) -> String {
    let collapsed = Regex::new(r"\n\s*\n\s*\n")
        .unwrap()
        .replace_all(content, "\n\n");
    collapsed.trim().to_string()
}

/// Pull ICD-10-shaped codes out of note text, first-seen order, no
/// duplicates.
pub fn extract_codes(content: &str) -> Vec<String> {
    let pattern = Regex::new(r"\b[A-Z]\d{2}(?:\.\d{1,4})?\b").unwrap();
    let mut seen = std::collections::HashSet::new();
    pattern
        .find_iter(content)
        .map(|m| m.as_str().to_string())
        .filter(|code| seen.insert(code.clone()))
        .collect()
}

/// Names of required sections missing from the note body. Empty means valid.
pub fn missing_sections(content: &str, note_type: NoteType) -> Vec<&'static str> {
    let required: &[&'static str] = match note_type {
        NoteType::Soap => &["Subjective", "Objective", "Assessment", "Plan"],
        NoteType::Referral => &["Reason for Referral", "Clinical History", "Assessment"],
        NoteType::Discharge => &["Admission Diagnosis", "Hospital Course", "Discharge Diagnosis"],
    };
    let haystack = content.to_lowercase();
    required
        .iter()
        .filter(|section| !haystack.contains(&section.to_lowercase()))
        .copied()
        .collect()
}
