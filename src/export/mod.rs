//! Note formatting and document export.
//!
//! `format_note` produces the canonical display text; the PDF and DOCX
//! exporters render exactly that text into their container formats, so all
//! three outputs carry the same header, body and signature content.

pub mod docx;
pub mod format;
pub mod pdf;

pub use format::*;

use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::crypto::{CryptoError, SecretKey};
use crate::models::{ClinicalNote, Doctor, Patient};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Encryption error: {0}")]
    Crypto(#[from] CryptoError),
}

/// Render a note to PDF bytes.
pub fn export_pdf(
    note: &ClinicalNote,
    patient: &Patient,
    doctor: &Doctor,
    clinic_name: &str,
) -> Result<Vec<u8>, ExportError> {
    let text = format_note(note, patient, doctor, clinic_name);
    pdf::render(&text, note.note_type.title())
}

/// Render a note to DOCX bytes.
pub fn export_docx(
    note: &ClinicalNote,
    patient: &Patient,
    doctor: &Doctor,
    clinic_name: &str,
) -> Result<Vec<u8>, ExportError> {
    let text = format_note(note, patient, doctor, clinic_name);
    docx::render(&text, note.note_type.title())
}

/// Write exported bytes to `path` atomically: the document lands in a
/// temporary file first and is renamed into place, so a failed export never
/// leaves a partial file behind.
pub fn write_export(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| {
            ExportError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("export path has no parent directory: {}", path.display()),
            ))
        })?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| ExportError::Io(e.error))?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Export written");
    Ok(())
}

/// Write an export encrypted at rest. The document bytes are sealed with the
/// vault key and written to `<path>.enc`; the plaintext document never
/// touches disk. Returns the path written.
pub fn write_export_encrypted(
    path: &Path,
    bytes: &[u8],
    key: &SecretKey,
) -> Result<PathBuf, ExportError> {
    let sealed = key.encrypt(bytes)?;

    let mut name = path.as_os_str().to_os_string();
    name.push(".enc");
    let enc_path = PathBuf::from(name);

    write_export(&enc_path, &sealed.to_bytes())?;
    Ok(enc_path)
}
