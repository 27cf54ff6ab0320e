use std::path::Path;

use async_trait::async_trait;
use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent, TableChild,
    TableRowChild,
};
use tracing::debug;

use crate::documents::{DocumentExtractor, DocumentKind, ExtractError, ExtractOptions};

/// In-process extractor: `pdf-extract` for PDF, `docx-rs` for DOCX.
pub struct NativeDocumentExtractor;

#[async_trait]
impl DocumentExtractor for NativeDocumentExtractor {
    async fn extract(
        &self,
        path: &Path,
        kind: DocumentKind,
        options: ExtractOptions,
    ) -> Result<String, ExtractError> {
        if options.ocr {
            return Err(ExtractError::OcrUnavailable);
        }

        let path = path.to_path_buf();
        let raw = tokio::task::spawn_blocking(move || match kind {
            DocumentKind::Pdf => extract_pdf(&path),
            DocumentKind::Docx => extract_docx(&path, options.table_structure),
        })
        .await
        .map_err(|e| ExtractError::Aborted(e.to_string()))??;

        let text = if options.layout {
            normalize_layout(&raw)
        } else {
            raw
        };

        debug!("Extracted {} chars from {:?} document", text.len(), kind);

        if text.trim().is_empty() {
            return Err(ExtractError::NoText);
        }
        Ok(text)
    }
}

fn extract_pdf(path: &Path) -> Result<String, ExtractError> {
    pdf_extract::extract_text(path).map_err(|e| ExtractError::Pdf(e.to_string()))
}

fn extract_docx(path: &Path, table_structure: bool) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path)?;
    let docx = docx_rs::read_docx(&bytes).map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut lines = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(p) => lines.push(paragraph_text(p)),
            DocumentChild::Table(t) => {
                lines.push(String::new());
                if table_structure {
                    lines.extend(table_markdown(t));
                } else {
                    lines.extend(table_cells(t));
                }
                lines.push(String::new());
            }
            _ => {}
        }
    }
    Ok(lines.join("\n"))
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut out = String::new();
    push_paragraph_children(&paragraph.children, &mut out);
    out
}

fn push_paragraph_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for rc in &run.children {
                    match rc {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) => out.push('\t'),
                        RunChild::Break(_) => out.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_paragraph_children(&link.children, out),
            _ => {}
        }
    }
}

fn table_rows(table: &Table) -> Vec<Vec<String>> {
    table
        .rows
        .iter()
        .filter_map(|row| match row {
            TableChild::TableRow(row) => Some(row),
            #[allow(unreachable_patterns)]
            _ => None,
        })
        .map(|row| {
            row.cells
                .iter()
                .filter_map(|cell| match cell {
                    TableRowChild::TableCell(cell) => Some(cell_text(&cell.children)),
                    #[allow(unreachable_patterns)]
                    _ => None,
                })
                .collect()
        })
        .collect()
}

fn cell_text(children: &[TableCellContent]) -> String {
    children
        .iter()
        .filter_map(|c| match c {
            TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
            _ => None,
        })
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders a table as a markdown pipe table; the first row is the header.
fn table_markdown(table: &Table) -> Vec<String> {
    let rows = table_rows(table);
    let mut out = Vec::with_capacity(rows.len() + 1);
    for (i, row) in rows.iter().enumerate() {
        let cells: Vec<String> = row.iter().map(|c| c.replace('|', "\\|")).collect();
        out.push(format!("| {} |", cells.join(" | ")));
        if i == 0 {
            out.push(format!("|{}", " --- |".repeat(row.len().max(1))));
        }
    }
    out
}

fn table_cells(table: &Table) -> Vec<String> {
    table_rows(table)
        .into_iter()
        .flatten()
        .filter(|c| !c.trim().is_empty())
        .collect()
}

/// Trims trailing whitespace and collapses runs of blank lines.
pub fn normalize_layout(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = false;
    for line in text.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            blank_run = true;
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if blank_run {
                out.push('\n');
            }
        }
        blank_run = false;
        out.push_str(line);
    }
    out
}
