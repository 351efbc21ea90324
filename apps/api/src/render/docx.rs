//! DOCX writer: one Office Open XML paragraph per resume line.
//!
//! The package is the minimal valid WordprocessingML set: content types, package
//! relationships, core properties and the main document part.

use std::io::{Cursor, Write};

use chrono::{DateTime, Utc};
use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::render::RenderError;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

const DOCUMENT_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#;

// US letter with 1" margins, in twentieths of a point.
const DOCUMENT_FOOTER: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr></w:body></w:document>"#;

/// Builds a DOCX package with one paragraph per entry in `lines`.
pub fn write_docx(lines: &[&str]) -> Result<Vec<u8>, RenderError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    // [Content_Types].xml first, as Word expects.
    write_part(&mut zip, "[Content_Types].xml", CONTENT_TYPES_XML)?;
    write_part(&mut zip, "_rels/.rels", ROOT_RELS_XML)?;
    write_part(&mut zip, "docProps/core.xml", &core_properties_xml(Utc::now()))?;
    write_part(&mut zip, "word/document.xml", &document_xml(lines))?;

    Ok(zip.finish()?.into_inner())
}

fn write_part<W: Write + std::io::Seek>(
    zip: &mut ZipWriter<W>,
    path: &str,
    content: &str,
) -> Result<(), RenderError> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(path, options)?;
    zip.write_all(content.as_bytes())?;
    Ok(())
}

/// Main document part. Blank lines become empty `<w:p/>` paragraphs.
fn document_xml(lines: &[&str]) -> String {
    let body_len: usize = lines.iter().map(|l| l.len() + 64).sum();
    let mut xml = String::with_capacity(DOCUMENT_HEADER.len() + body_len + DOCUMENT_FOOTER.len());
    xml.push_str(DOCUMENT_HEADER);

    for line in lines {
        let text = xml_safe_text(line);
        if text.is_empty() {
            xml.push_str("<w:p/>");
        } else {
            xml.push_str(r#"<w:p><w:r><w:t xml:space="preserve">"#);
            xml.push_str(&escape(text.as_str()));
            xml.push_str("</w:t></w:r></w:p>");
        }
    }

    xml.push_str(DOCUMENT_FOOTER);
    xml
}

fn core_properties_xml(created: DateTime<Utc>) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>Resume</dc:title><dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created></cp:coreProperties>"#,
        created.format("%Y-%m-%dT%H:%M:%SZ")
    )
}

/// Drops characters XML 1.0 cannot carry (C0 controls other than tab, U+FFFE, U+FFFF).
fn xml_safe_text(line: &str) -> String {
    line.chars()
        .filter(|&c| c == '\t' || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}'))
        .collect()
}
