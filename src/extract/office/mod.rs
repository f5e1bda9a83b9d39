
use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, Run, RunChild, Table, TableCellContent, TableChild,
    TableRowChild,
};
use tracing::debug;

use super::html::normalize_whitespace;
use crate::{PlagiarismError, Result};

/// Extract text from PDF bytes
#[inline]
pub fn pdf_to_text(bytes: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| PlagiarismError::Extraction(format!("Failed to extract PDF text: {}", e)))?;
    debug!("Extracted {} chars from PDF", text.len());
    Ok(normalize_whitespace(&text))
}

/// Extract text from DOCX bytes, one line per paragraph.
///
/// Text runs are concatenated, tabs become spaces and breaks become line breaks.
/// Table cells are read row by row.
#[inline]
pub fn docx_to_text(bytes: &[u8]) -> Result<String> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| PlagiarismError::Extraction(format!("Failed to read DOCX: {}", e)))?;

    let mut text = String::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => push_paragraph(&mut text, paragraph),
            DocumentChild::Table(table) => push_table(&mut text, table),
            _ => {}
        }
    }

    let text = normalize_whitespace(&text);
    debug!("Extracted {} chars from DOCX", text.len());
    Ok(text)
}

fn push_paragraph(text: &mut String, paragraph: &Paragraph) {
    push_paragraph_children(text, &paragraph.children);
    text.push('\n');
}

fn push_paragraph_children(text: &mut String, children: &[ParagraphChild]) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run(text, run),
            ParagraphChild::Hyperlink(link) => push_paragraph_children(text, &link.children),
            _ => {}
        }
    }
}

fn push_run(text: &mut String, run: &Run) {
    for child in &run.children {
        match child {
            RunChild::Text(run_text) => text.push_str(&run_text.text),
            RunChild::Tab(_) => text.push(' '),
            RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}

fn push_table(text: &mut String, table: &Table) {
    for TableChild::TableRow(row) in &table.rows {
        for TableRowChild::TableCell(cell) in &row.cells {
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(paragraph) => push_paragraph(text, paragraph),
                    TableCellContent::Table(nested) => push_table(text, nested),
                    _ => {}
                }
            }
        }
    }
}
