//! Prompt assembly for clinical note generation.
//!
//! One template per note type, with named placeholders filled from the
//! transcript and the selected patient's record. The system instruction
//! pins the model to documentation only: no new diagnoses, no advice.

use crate::models::{NoteType, Patient};

/// System instruction shared by every note type.
const SYSTEM_INSTRUCTION: &str = "You are an AI medical documentation assistant. \
Convert the following patient consultation into a structured clinical note. \
Include a likely ICD-10 code based on the described condition. \
Do not make new diagnoses or give treatment advice - only document what is stated. \
Be concise and professional.";

const SOAP_TEMPLATE: &str = "\
Format the note as follows:

Subjective:
[Patient's reported symptoms, complaints, and medical history]

Objective:
[Physical examination findings, vital signs, test results]

Assessment:
[Clinical impression and diagnosis]
ICD-10 Code: [Code] - [Description]

Plan:
[Treatment plan, medications, follow-up instructions]

Patient Context:
{patient_context}

Patient Consultation:
{transcript}

Generate the clinical note now:";

const REFERRAL_TEMPLATE: &str = "\
Format the note as follows:

Patient Information:
[Name, age, relevant demographics]

Reason for Referral:
[Primary concern requiring specialist consultation]

Clinical History:
[Relevant medical history and current condition]

Assessment:
[Current diagnosis]
ICD-10 Code: [Code] - [Description]

Requested Action:
[Specific evaluation or treatment needed from specialist]

Patient Context:
{patient_context}

Patient Consultation:
{transcript}

Generate the clinical note now:";

const DISCHARGE_TEMPLATE: &str = "\
Format the note as follows:

Patient Summary:
[Brief overview of hospital stay]

Admission Diagnosis:
[Reason for admission]

Hospital Course:
[Treatment provided and patient progress]

Discharge Diagnosis:
[Final diagnosis]
ICD-10 Code: [Code] - [Description]

Discharge Instructions:
[Medications, activity restrictions, follow-up care]

Follow-up:
[Appointments and monitoring needed]

Patient Context:
{patient_context}

Patient Consultation:
{transcript}

Generate the clinical note now:";

/// Patient fields the prompt is allowed to see.
#[derive(Debug, Clone, Default)]
pub struct PatientContext {
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub diagnosis: String,
}

impl From<&Patient> for PatientContext {
    fn from(patient: &Patient) -> Self {
        Self {
            name: patient.name.clone(),
            age: patient.age,
            gender: patient.gender.clone(),
            diagnosis: patient.diagnosis.clone(),
        }
    }
}

impl PatientContext {
    fn render(&self) -> String {
        let mut lines = vec![format!("Name: {}", self.name), format!("Age: {}", self.age)];
        if !self.gender.is_empty() {
            lines.push(format!("Gender: {}", self.gender));
        }
        if !self.diagnosis.is_empty() {
            lines.push(format!("Known diagnosis: {}", self.diagnosis));
        }
        lines.join("\n")
    }
}

fn template_for(note_type: NoteType) -> &'static str {
    match note_type {
        NoteType::Soap => SOAP_TEMPLATE,
        NoteType::Referral => REFERRAL_TEMPLATE,
        NoteType::Discharge => DISCHARGE_TEMPLATE,
    }
}

/// The system instruction sent alongside every prompt.
pub fn system_instruction() -> &'static str {
    SYSTEM_INSTRUCTION
}

/// Fill a template's placeholders. Custom templates (from configuration)
/// use the same `{patient_context}` and `{transcript}` markers as the
/// built-ins.
pub fn render_template(template: &str, transcript: &str, context: &PatientContext) -> String {
    template
        .replace("{patient_context}", &context.render())
        .replace("{transcript}", transcript)
}

/// Fill the built-in template for `note_type` with the transcript and
/// patient context.
pub fn build_prompt(note_type: NoteType, transcript: &str, context: &PatientContext) -> String {
    render_template(template_for(note_type), transcript, context)
}
