//! Document text extraction for uploaded résumés (PDF, DOCX, plain text).

use std::io::{Cursor, Read};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::services::{DocumentTextExtractor, ExtractionError};

const DOCX_BODY: &str = "word/document.xml";

/// Dispatches on the file extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTextExtractor;

impl DocumentTextExtractor for FileTextExtractor {
    fn extract(&self, file_name: &str, bytes: &[u8]) -> Result<String, ExtractionError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let text = match extension.as_str() {
            "pdf" => extract_pdf(bytes)?,
            "docx" => extract_docx(bytes)?,
            "txt" | "md" => String::from_utf8(bytes.to_vec()).map_err(|_| ExtractionError::Encoding)?,
            other => return Err(ExtractionError::Unsupported(other.to_string())),
        };

        if text.trim().is_empty() {
            return Err(ExtractionError::Empty);
        }
        Ok(text)
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractionError::Docx(e.to_string()))?;
    let mut body = archive
        .by_name(DOCX_BODY)
        .map_err(|e| ExtractionError::Docx(format!("{DOCX_BODY}: {e}")))?;

    let mut xml = String::new();
    body.read_to_string(&mut xml)
        .map_err(|e| ExtractionError::Docx(e.to_string()))?;

    docx_xml_to_text(&xml)
}

/// Flattens WordprocessingML to text, one line per non-empty paragraph.
///
/// Only `w:t` content is kept. Breaks (`w:br`, `w:cr`) become newlines and
/// `w:tab` a tab when they sit inside a run; tab stops in paragraph
/// properties are ignored.
fn docx_xml_to_text(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader
            .read_event()
            .map_err(|e| ExtractionError::Docx(e.to_string()))?
        {
            Event::Start(e) => match e.local_name().as_ref() {
                b"r" => in_run = true,
                b"t" => in_text = true,
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"r" => in_run = false,
                b"t" => in_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"br" | b"cr" if in_run => text.push('\n'),
                b"tab" if in_run => text.push('\t'),
                b"p" => text.push('\n'),
                _ => {}
            },
            Event::Text(e) if in_text => {
                let unescaped = e
                    .unescape()
                    .map_err(|e| ExtractionError::Docx(e.to_string()))?;
                text.push_str(&unescaped);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(DOCX_BODY, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_plain_text_passthrough() {
        let text = FileTextExtractor
            .extract("resume.TXT", b"5 years of experience in Rust")
            .unwrap();
        assert_eq!(text, "5 years of experience in Rust");
    }

    #[test]
    fn test_docx_paragraphs_become_lines() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
            <w:p><w:r><w:t>Python &amp; SQL</w:t></w:r><w:r><w:t xml:space="preserve"> developer</w:t></w:r></w:p>
        </w:body></w:document>"#;
        let text = FileTextExtractor.extract("cv.docx", &build_docx(xml)).unwrap();
        assert_eq!(text, "Jane Doe\nPython & SQL developer");
    }

    #[test]
    fn test_docx_without_body_fails() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/styles.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<w:styles/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = FileTextExtractor.extract("cv.docx", &bytes).unwrap_err();
        assert!(matches!(err, ExtractionError::Docx(_)));
    }

    #[test]
    fn test_corrupt_docx_fails() {
        let err = FileTextExtractor.extract("cv.docx", b"not a zip").unwrap_err();
        assert!(matches!(err, ExtractionError::Docx(_)));
    }

    #[test]
    fn test_corrupt_pdf_fails() {
        let err = FileTextExtractor.extract("cv.pdf", b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, ExtractionError::Pdf(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = FileTextExtractor.extract("photo.png", b"\x89PNG").unwrap_err();
        assert!(matches!(err, ExtractionError::Unsupported(ext) if ext == "png"));
    }

    #[test]
    fn test_missing_extension_is_unsupported() {
        let err = FileTextExtractor.extract("resume", b"text").unwrap_err();
        assert!(matches!(err, ExtractionError::Unsupported(_)));
    }

    #[test]
    fn test_blank_document_is_empty() {
        let err = FileTextExtractor.extract("blank.txt", b"  \n\t ").unwrap_err();
        assert!(matches!(err, ExtractionError::Empty));
    }

    #[test]
    fn test_invalid_utf8_text() {
        let err = FileTextExtractor.extract("bad.txt", &[0xff, 0xfe, 0xfd]).unwrap_err();
        assert!(matches!(err, ExtractionError::Encoding));
    }

    #[test]
    fn test_docx_breaks_and_character_references() {
        let xml = r#"<w:document><w:body><w:p>
            <w:r><w:t>Python</w:t><w:br w:type="textWrapping"/><w:t>Docker</w:t><w:cr/><w:t>AWS</w:t></w:r>
            </w:p><w:p><w:r><w:t>Jane&#8217;s CV &#38; more</w:t></w:r></w:p></w:body></w:document>"#;
        let text = FileTextExtractor.extract("cv.docx", &build_docx(xml)).unwrap();
        assert_eq!(text, "Python\nDocker\nAWS\nJane\u{2019}s CV & more");
    }

    #[test]
    fn test_docx_tabs_inside_runs_only() {
        let xml = r#"<w:document><w:body><w:p>
            <w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>
            <w:r><w:t>Skills:</w:t><w:tab/><w:t>SQL</w:t></w:r>
            </w:p></w:body></w:document>"#;
        let text = FileTextExtractor.extract("cv.docx", &build_docx(xml)).unwrap();
        assert_eq!(text, "Skills:\tSQL");
    }

    #[test]
    fn test_docx_escaped_markup_stays_literal() {
        let xml = r#"<w:document><w:body><w:p><w:r><w:t>a &amp;lt; b &lt; c</w:t></w:r></w:p></w:body></w:document>"#;
        let text = FileTextExtractor.extract("cv.docx", &build_docx(xml)).unwrap();
        assert_eq!(text, "a &lt; b < c");
    }

    #[test]
    fn test_malformed_document_xml_fails() {
        let xml = "<w:document><w:body><w:p><w:r><w:t>open</w:r></w:p>";
        let err = FileTextExtractor.extract("cv.docx", &build_docx(xml)).unwrap_err();
        assert!(matches!(err, ExtractionError::Docx(_)));
    }
}
