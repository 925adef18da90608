//! PDF report rendering via `printpdf`.
//!
//! Field set and ordering are the exporter contract: report title, patient
//! name, generation timestamp, the selected symptom list (comma-joined),
//! the ranked predictions (one `condition - NN.NN%` line each), and a
//! fixed disclaimer line. Layout and typography carry no contract beyond
//! that ordering.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::Local;
use printpdf::*;

use crate::report_store::ReportRecord;

pub const REPORT_TITLE: &str = "Disease Prediction Report";
pub const DISCLAIMER: &str =
    "Disclaimer: This report is AI-generated and not a medical diagnosis.";

/// MIME type of the exported document.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("PDF assembly error: {0}")]
    Pdf(String),
}

/// Suggested download filename: patient name with whitespace collapsed
/// to underscores, plus a fixed suffix.
pub fn suggested_filename(patient: &str) -> String {
    let safe: String = patient
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("{safe}_report.pdf")
}

/// Render a report record to PDF bytes.
///
/// The generation timestamp is stamped at render time, matching when the
/// user actually downloads the document.
pub fn render_pdf(record: &ReportRecord) -> Result<Vec<u8>, ReportError> {
    let (doc, page1, layer1) = PdfDocument::new(REPORT_TITLE, Mm(210.0), Mm(297.0), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Pdf(format!("font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Pdf(format!("font error: {e}")))?;
    let italic = doc
        .add_builtin_font(BuiltinFont::HelveticaOblique)
        .map_err(|e| ReportError::Pdf(format!("font error: {e}")))?;

    let mut y = Mm(280.0);

    // Title
    layer.use_text(REPORT_TITLE, 18.0, Mm(20.0), y, &bold);
    y -= Mm(14.0);

    // Patient + timestamp
    layer.use_text(
        format!("Patient Name: {}", record.patient),
        12.0,
        Mm(20.0),
        y,
        &font,
    );
    y -= Mm(7.0);
    layer.use_text(
        format!("Date: {}", Local::now().format("%Y-%m-%d %H:%M:%S")),
        12.0,
        Mm(20.0),
        y,
        &font,
    );
    y -= Mm(10.0);

    // Symptoms, comma-joined
    layer.use_text("Selected Symptoms:", 12.0, Mm(20.0), y, &bold);
    y -= Mm(6.0);
    for line in wrap_text(&record.symptoms.join(", "), 80) {
        layer.use_text(&line, 11.0, Mm(25.0), y, &font);
        y -= Mm(5.5);
    }
    y -= Mm(5.0);

    // Ranked predictions, one per line
    layer.use_text("Top Predictions:", 12.0, Mm(20.0), y, &bold);
    y -= Mm(6.0);
    for entry in &record.conditions {
        let line = format!("{} - {:.2}%", entry.condition, entry.confidence);
        layer.use_text(&line, 11.0, Mm(25.0), y, &font);
        y -= Mm(5.5);
    }

    // Disclaimer
    y -= Mm(10.0);
    for line in wrap_text(DISCLAIMER, 90) {
        layer.use_text(&line, 10.0, Mm(20.0), y, &italic);
        y -= Mm(5.0);
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError::Pdf(format!("save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ReportError::Pdf(format!("buffer error: {e}")))
}

/// Write a copy of an exported report under the reports directory.
///
/// Mirrors the download the user received; a failure here is logged by
/// the caller and does not fail the download itself.
pub fn save_report_copy(
    pdf_bytes: &[u8],
    filename: &str,
    reports_dir: &Path,
) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(reports_dir)?;
    let path = reports_dir.join(filename);
    std::fs::write(&path, pdf_bytes)?;
    Ok(path)
}

/// Simple word-wrap helper for PDF text rendering.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
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
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::RankedCondition;

    fn sample_record() -> ReportRecord {
        ReportRecord {
            patient: "Alice Martin".into(),
            symptoms: vec!["fever".into(), "cough".into(), "headache".into()],
            conditions: vec![
                RankedCondition {
                    condition: "Flu".into(),
                    confidence: 61.52,
                },
                RankedCondition {
                    condition: "Dengue".into(),
                    confidence: 21.04,
                },
                RankedCondition {
                    condition: "Common Cold".into(),
                    confidence: 9.11,
                },
            ],
        }
    }

    #[test]
    fn render_produces_pdf_bytes() {
        let bytes = render_pdf(&sample_record()).unwrap();
        assert!(!bytes.is_empty());
        // PDF magic bytes: %PDF
        assert_eq!(&bytes[0..4], b"%PDF");
    }

    #[test]
    fn render_handles_single_prediction() {
        let mut record = sample_record();
        record.conditions.truncate(1);
        let bytes = render_pdf(&record).unwrap();
        assert_eq!(&bytes[0..4], b"%PDF");
    }

    #[test]
    fn suggested_filename_replaces_whitespace() {
        assert_eq!(suggested_filename("Alice Martin"), "Alice_Martin_report.pdf");
        assert_eq!(suggested_filename("Bob"), "Bob_report.pdf");
        assert_eq!(
            suggested_filename("Ana  Maria\tSilva"),
            "Ana_Maria_Silva_report.pdf"
        );
    }

    #[test]
    fn save_report_copy_creates_directory_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        let reports_dir = tmp.path().join("reports");

        let path = save_report_copy(b"%PDF-1.4 test", "Alice_report.pdf", &reports_dir).unwrap();

        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4 test");
        assert!(path.ends_with("Alice_report.pdf"));
    }

    #[test]
    fn wrap_text_splits_long_lines() {
        let text = "This is a long sentence that should be wrapped at around forty characters or so.";
        let lines = wrap_text(text, 40);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.len() <= 45); // Allow some slack for word boundaries
        }
    }

    #[test]
    fn wrap_text_short_input_is_one_line() {
        let lines = wrap_text("Short", 40);
        assert_eq!(lines, vec!["Short"]);
    }

    #[test]
    fn wrap_text_empty_input_is_one_empty_line() {
        let lines = wrap_text("", 40);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].is_empty());
    }
}
