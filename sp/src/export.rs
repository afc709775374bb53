//! Plan export
//!
//! Writes the generated plan to a plain text file or an A4 PDF document.
//! Output files are overwritten on every export.

use eyre::{Context, Result, eyre};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::fs;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info};

/// A4 page size in millimeters
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;

/// Left/top margin and column bottom
const MARGIN_MM: f32 = 10.0;
const BOTTOM_MARGIN_MM: f32 = 20.0;

const LINE_HEIGHT_MM: f32 = 8.0;
const FONT_SIZE_PT: f32 = 12.0;

/// Character budget for one line of 12pt Helvetica on A4
const MAX_LINE_CHARS: usize = 90;

/// Write the plan text verbatim to a file
pub fn write_text(plan: &str, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    debug!(?path, "write_text: called");
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).context("Failed to create export directory")?;
    }
    fs::write(path, plan).context("Failed to write text export")?;
    info!(?path, "Exported plan as text");
    Ok(())
}

/// Render the plan into an A4 PDF, one paragraph per plan line
///
/// Uses the built-in Helvetica font and starts a new page when the column
/// is full. Long paragraphs wrap on whitespace at a fixed character budget.
pub fn write_pdf(plan: &str, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    debug!(?path, "write_pdf: called");
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).context("Failed to create export directory")?;
    }

    let (doc, first_page, first_layer) =
        PdfDocument::new("AI Study Plan", Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| eyre!("Failed to load built-in font: {}", e))?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    for paragraph in plan.lines() {
        for line in wrap_line(paragraph, MAX_LINE_CHARS) {
            if y < BOTTOM_MARGIN_MM {
                let (page, page_layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
                layer = doc.get_page(page).get_layer(page_layer);
                y = PAGE_HEIGHT_MM - MARGIN_MM;
            }
            layer.use_text(line, FONT_SIZE_PT, Mm(MARGIN_MM), Mm(y), &font);
            y -= LINE_HEIGHT_MM;
        }
    }

    let file = fs::File::create(path).context("Failed to create PDF export")?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| eyre!("Failed to write PDF export: {}", e))?;
    info!(?path, "Exported plan as PDF");
    Ok(())
}

/// Split a paragraph into lines of at most `max_chars`, breaking on spaces
///
/// Words longer than the budget are kept whole.
fn wrap_line(paragraph: &str, max_chars: usize) -> Vec<String> {
    if paragraph.chars().count() <= max_chars {
        return vec![paragraph.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in paragraph.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut current));
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_text_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("plan.txt");

        write_text("Day 1: algebra\nDay 2: optics", &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Day 1: algebra\nDay 2: optics");
    }

    #[test]
    fn test_write_text_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("plan.txt");

        write_text("old plan", &path).unwrap();
        write_text("new plan", &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "new plan");
    }

    #[test]
    fn test_write_pdf_creates_pdf_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("plan.pdf");

        write_pdf("Day 1: algebra\n\nDay 2: optics", &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_write_pdf_handles_long_plans() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("plan.pdf");

        // Enough paragraphs to force several page breaks
        let plan = (1..=200).map(|i| format!("Day {}: revise", i)).collect::<Vec<_>>().join("\n");
        write_pdf(&plan, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_wrap_line_short_passthrough() {
        assert_eq!(wrap_line("short line", 90), vec!["short line".to_string()]);
        assert_eq!(wrap_line("", 90), vec![String::new()]);
    }

    #[test]
    fn test_wrap_line_breaks_on_spaces() {
        let wrapped = wrap_line("aaa bbb ccc ddd", 10);
        assert_eq!(wrapped, vec!["aaa bbb".to_string(), "ccc ddd".to_string()]);
    }

    #[test]
    fn test_wrap_line_keeps_long_words_whole() {
        let wrapped = wrap_line("supercalifragilistic word", 10);
        assert_eq!(wrapped, vec!["supercalifragilistic".to_string(), "word".to_string()]);
    }
}
