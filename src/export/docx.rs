//! DOCX rendering of a formatted note via `docx-rs`.

use std::io::Cursor;

use docx_rs::{Docx, Paragraph, Run};

use super::ExportError;

/// Render pre-formatted note text (see `format_note`) into DOCX bytes.
///
/// Every line of the display form becomes one paragraph, so the document
/// carries exactly the same header/body/signature content as `format_note`.
pub fn render(text: &str, _title: &str) -> Result<Vec<u8>, ExportError> {
    let mut docx = Docx::new();

    for line in text.lines() {
        let mut run = Run::new().add_text(line);
        if is_heading(line) {
            run = run.bold();
        }
        docx = docx.add_paragraph(Paragraph::new().add_run(run));
    }

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| ExportError::Render(format!("DOCX pack error: {e}")))?;
    Ok(cursor.into_inner())
}

fn is_heading(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.ends_with(':') && trimmed.len() < 50
}
