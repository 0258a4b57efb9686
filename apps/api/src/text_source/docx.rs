//! Plain-text walk over an Office Open XML word-processing document.
//!
//! Body paragraphs come first, in document order; table rows follow, one line
//! per row with non-empty cells joined by ` | `.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::ExtractionError;

const DOCUMENT_PART: &str = "word/document.xml";

pub fn extract_text(content: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = ZipArchive::new(Cursor::new(content))
        .map_err(|e| ExtractionError::Docx(format!("not an Open XML archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractionError::Docx(format!("missing {DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::Docx(format!("unreadable {DOCUMENT_PART}: {e}")))?;

    Ok(parse_document_xml(&xml)?.into_text())
}

#[derive(Debug, Default)]
struct DocumentBody {
    paragraphs: Vec<String>,
    table_rows: Vec<String>,
}

impl DocumentBody {
    fn into_text(self) -> String {
        self.paragraphs
            .into_iter()
            .chain(self.table_rows)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }
}

fn parse_document_xml(xml: &str) -> Result<DocumentBody, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut body = DocumentBody::default();
    let mut table_depth = 0usize;
    let mut in_text = false;
    let mut paragraph = String::new();
    let mut cell: Vec<String> = Vec::new();
    let mut row: Vec<String> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"tbl" => table_depth += 1,
                b"tr" if table_depth == 1 => row.clear(),
                b"tc" if table_depth == 1 => cell.clear(),
                b"p" => paragraph.clear(),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => paragraph.push('\t'),
                b"br" | b"cr" => paragraph.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractionError::Docx(format!("bad text node: {e}")))?;
                paragraph.push_str(&text);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    let text = paragraph.trim();
                    if !text.is_empty() {
                        if table_depth == 0 {
                            body.paragraphs.push(text.to_string());
                        } else {
                            cell.push(text.to_string());
                        }
                    }
                    paragraph.clear();
                }
                b"tc" if table_depth == 1 => {
                    let text = cell.join("\n");
                    if !text.trim().is_empty() {
                        row.push(text.trim().to_string());
                    }
                }
                b"tr" if table_depth == 1 && !row.is_empty() => {
                    body.table_rows.push(row.join(" | "));
                }
                b"tbl" => table_depth = table_depth.saturating_sub(1),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractionError::Docx(format!(
                    "malformed {DOCUMENT_PART} at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    use super::*;

    fn document(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        )
    }

    fn archive(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut cursor);
            for (name, content) in parts {
                let options =
                    SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
                zip.start_file(*name, options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_paragraphs_then_table_rows() {
        let xml = document(concat!(
            r#"<w:p><w:r><w:t>Jane</w:t></w:r><w:r><w:t xml:space="preserve"> Smith</w:t></w:r></w:p>"#,
            r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>Email</w:t></w:r></w:p></w:tc>"#,
            r#"<w:tc><w:p><w:r><w:t>jane@example.com</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
            r#"<w:p><w:r><w:t>Skills: Rust &amp; Go</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>   </w:t></w:r></w:p>"#,
        ));
        let bytes = archive(&[("word/document.xml", &xml)]);

        assert_eq!(
            extract_text(&bytes).unwrap(),
            "Jane Smith\nSkills: Rust & Go\nEmail | jane@example.com"
        );
    }

    #[test]
    fn test_empty_cells_are_skipped() {
        let xml = document(concat!(
            r#"<w:tbl><w:tr><w:tc><w:p/></w:tc><w:tc><w:p><w:r><w:t>Python</w:t></w:r></w:p></w:tc></w:tr>"#,
            r#"<w:tr><w:tc><w:p/></w:tc></w:tr></w:tbl>"#,
        ));
        let bytes = archive(&[("word/document.xml", &xml)]);
        assert_eq!(extract_text(&bytes).unwrap(), "Python");
    }

    #[test]
    fn test_tabs_and_breaks() {
        let xml = document(r#"<w:p><w:r><w:t>A</w:t><w:tab/><w:t>B</w:t><w:br/><w:t>C</w:t></w:r></w:p>"#);
        let bytes = archive(&[("word/document.xml", &xml)]);
        assert_eq!(extract_text(&bytes).unwrap(), "A\tB\nC");
    }

    #[test]
    fn test_not_a_zip() {
        let err = extract_text(b"plain bytes").unwrap_err();
        assert!(matches!(err, ExtractionError::Docx(_)));
    }

    #[test]
    fn test_missing_document_part() {
        let bytes = archive(&[("word/styles.xml", "<w:styles/>")]);
        let err = extract_text(&bytes).unwrap_err();
        assert!(err.to_string().contains("word/document.xml"));
    }
}
