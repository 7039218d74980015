//! PDF rendering of a formatted note via `printpdf`.

use std::io::BufWriter;

use printpdf::*;

use super::ExportError;

const PAGE_WIDTH: f32 = 210.0; // A4
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 20.0;
const MARGIN_TOP: f32 = 280.0;
const MARGIN_BOTTOM: f32 = 18.0;
const WRAP_COLUMNS: usize = 92;

/// Render pre-formatted note text (see `format_note`) into PDF bytes.
pub fn render(text: &str, title: &str) -> Result<Vec<u8>, ExportError> {
    let (doc, page1, layer1) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");

    let font = doc
        .add_builtin_font(BuiltinFont::Courier)
        .map_err(|e| ExportError::Render(format!("font load: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::CourierBold)
        .map_err(|e| ExportError::Render(format!("font load: {e}")))?;

    let mut layer = doc.get_page(page1).get_layer(layer1);
    let mut y = Mm(MARGIN_TOP);

    for raw_line in text.lines() {
        if raw_line.is_empty() {
            y -= Mm(3.5);
            continue;
        }

        let heading = is_heading(raw_line);
        let (size, face, step) = if heading {
            (10.0, &bold, 5.5)
        } else {
            (8.5, &font, 4.5)
        };

        for line in wrap_text(raw_line, WRAP_COLUMNS) {
            if y < Mm(MARGIN_BOTTOM) {
                let (page, new_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
                layer = doc.get_page(page).get_layer(new_layer);
                y = Mm(MARGIN_TOP);
            }
            layer.use_text(&line, size, Mm(MARGIN_LEFT), y, face);
            y -= Mm(step);
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ExportError::Render(format!("PDF save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ExportError::Render(format!("PDF buffer error: {e}")))
}

/// Short lines ending in a colon render bold, matching section headings in
/// the formatted note.
fn is_heading(line: &str) -> bool {
    let trimmed = line.trim();
    (trimmed.ends_with(':') && trimmed.len() < 50) || trimmed.chars().all(|c| c == '=' || c == '-')
}

/// Simple word-wrap helper for PDF text rendering.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    if text.len() <= max_chars {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word = word;
        // Hard-split tokens that cannot fit on a line of their own.
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let mut split = max_chars;
            while !word.is_char_boundary(split) {
                split -= 1;
            }
            let (head, tail) = word.split_at(split);
            lines.push(head.to_string());
            word = tail;
        }
        if current.len() + word.len() + 1 > max_chars && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
