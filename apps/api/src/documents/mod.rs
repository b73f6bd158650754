//! Resume document ingestion: PDF and DOCX to plain text.

use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, Event};
use quick_xml::Reader;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("unsupported file type: {0} (expected .pdf or .docx)")]
    Unsupported(String),

    #[error("failed to read PDF: {0}")]
    Pdf(String),

    #[error("failed to read DOCX: {0}")]
    Docx(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Detects the kind from the file extension, case-insensitively.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|v| v.to_str())
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            _ => None,
        }
    }
}

/// Extracts trimmed plain text from an uploaded resume.
/// CPU-bound; async callers should run it on the blocking pool.
pub fn extract_resume_text(file_name: &str, data: &[u8]) -> Result<String, DocumentError> {
    let kind = DocumentKind::from_file_name(file_name)
        .ok_or_else(|| DocumentError::Unsupported(file_name.to_string()))?;

    let text = match kind {
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(data)
            .map_err(|e| DocumentError::Pdf(e.to_string()))?,
        DocumentKind::Docx => extract_docx_text(data)?,
    };
    Ok(text.trim().to_string())
}

fn docx_error(e: impl std::fmt::Display) -> DocumentError {
    DocumentError::Docx(e.to_string())
}

/// Paragraph (`w:p`) text from `word/document.xml`, one paragraph per line.
/// Runs are concatenated as written; only the assembled paragraph is trimmed.
fn extract_docx_text(data: &[u8]) -> Result<String, DocumentError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).map_err(docx_error)?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(docx_error)?
        .read_to_string(&mut xml)
        .map_err(docx_error)?;

    let mut reader = Reader::from_str(&xml);

    let mut buf = Vec::new();
    let mut current = String::new();
    let mut lines = Vec::new();
    let mut in_paragraph = false;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf).map_err(docx_error)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => {
                    in_paragraph = true;
                    current.clear();
                }
                b"w:t" => in_text = in_paragraph,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:p" => {
                    if !current.trim().is_empty() {
                        lines.push(current.trim().to_string());
                    }
                    current.clear();
                    in_paragraph = false;
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Empty(e) if in_paragraph && matches!(e.name().as_ref(), b"w:tab" | b"w:br") => {
                current.push(' ');
            }
            Event::Text(e) if in_text => {
                current.push_str(&e.xml_content().map_err(docx_error)?);
            }
            Event::GeneralRef(e) if in_text => push_reference(&mut current, &e)?,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(lines.join("\n"))
}

/// Resolves `&amp;`-style and numeric references; unknown entities are dropped.
fn push_reference(out: &mut String, reference: &BytesRef<'_>) -> Result<(), DocumentError> {
    if let Some(ch) = reference.resolve_char_ref().map_err(docx_error)? {
        out.push(ch);
        return Ok(());
    }
    let name = reference.decode().map_err(docx_error)?;
    if let Some(value) = resolve_predefined_entity(&name) {
        out.push_str(value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn docx_with(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(DocumentKind::from_file_name("cv.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_file_name("my.resume.docx"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_file_name("resume.txt"), None);
        assert_eq!(DocumentKind::from_file_name("resume"), None);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = extract_resume_text("resume.odt", b"anything").unwrap_err();
        assert!(matches!(err, DocumentError::Unsupported(name) if name == "resume.odt"));
    }

    #[test]
    fn test_docx_paragraphs_become_lines() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Priya Sharma</w:t></w:r></w:p>
    <w:p><w:r><w:t>Backend engineer,</w:t></w:r><w:r><w:t>Rust and Go</w:t></w:r></w:p>
    <w:p></w:p>
  </w:body>
</w:document>"#;
        let text = extract_resume_text("resume.docx", &docx_with(xml)).unwrap();
        assert_eq!(text, "Priya Sharma\nBackend engineer,Rust and Go");
    }

    #[test]
    fn test_docx_keeps_run_spacing_and_entities() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p>
      <w:r><w:t xml:space="preserve">Built </w:t></w:r>
      <w:r><w:t>REST APIs in Python</w:t></w:r>
    </w:p>
    <w:p><w:r><w:t>R&amp;D intern at AT&amp;T Labs</w:t></w:r></w:p>
    <w:p><w:r><w:t>Skills:</w:t><w:tab/><w:t>Go&#44; Rust</w:t><w:br/><w:t>SQL</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
        let text = extract_resume_text("resume.docx", &docx_with(xml)).unwrap();
        assert_eq!(
            text,
            "Built REST APIs in Python\nR&D intern at AT&T Labs\nSkills: Go, Rust SQL"
        );
    }

    #[test]
    fn test_docx_without_document_part() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("other.xml", SimpleFileOptions::default())
            .unwrap();
        let bytes = writer.finish().unwrap().into_inner();
        assert!(matches!(
            extract_resume_text("resume.docx", &bytes),
            Err(DocumentError::Docx(_))
        ));
    }

    #[test]
    fn test_corrupt_pdf_is_an_error() {
        assert!(matches!(
            extract_resume_text("resume.pdf", b"not a pdf"),
            Err(DocumentError::Pdf(_))
        ));
    }
}
