//! Word container packaging
//!
//! Turns a [`RenderedDocument`] into `.docx` bytes. The default
//! [`AltChunkPackager`] embeds the HTML unchanged as an altChunk part (a
//! single-part MHTML message) and lets Word import it when the file is
//! opened. The page setup of the layout bundle is repeated in the section
//! properties so Word applies it even when it ignores the embedded CSS.

use chrono::{DateTime, Utc};
use log::{debug, info};
use std::fmt::Write as _;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::core::document::RenderedDocument;
use crate::data::styles::{LayoutDirectives, Orientation};
use crate::utils::error::{ConversionError, ConversionResult};
use crate::utils::html::escape_xml;

/// Packaging collaborator
///
/// Implementations:
/// - `AltChunkPackager`: zip container with an imported HTML part (default)
/// - any `Fn(&RenderedDocument) -> ConversionResult<Vec<u8>>` closure
pub trait DocumentPackager: Send + Sync {
    /// Produce the binary container for a serialized document
    fn pack(&self, doc: &RenderedDocument) -> ConversionResult<Vec<u8>>;
}

impl<F> DocumentPackager for F
where
    F: Fn(&RenderedDocument) -> ConversionResult<Vec<u8>> + Send + Sync,
{
    fn pack(&self, doc: &RenderedDocument) -> ConversionResult<Vec<u8>> {
        self(doc)
    }
}

/// Twips per inch
const TWIPS_PER_INCH: f32 = 1440.0;
/// Letter paper in twips
const PAGE_WIDTH_TWIPS: u32 = 12240;
const PAGE_HEIGHT_TWIPS: u32 = 15840;
/// Gap between columns (0.3in)
const COLUMN_GAP_TWIPS: u32 = 432;
/// Header and footer distance (0.5in)
const HEADER_FOOTER_TWIPS: u32 = 720;

const CHUNK_PART: &str = "word/afchunk.mht";
const CHUNK_REL_ID: &str = "htmlChunk";
const MHT_BOUNDARY: &str = "----=mhtDocumentPart";
/// Quoted-printable lines are at most 76 characters including the soft break
const QP_LINE_LIMIT: usize = 75;

/// Packs the HTML as an altChunk inside a minimal WordprocessingML package
#[derive(Debug, Clone, Default)]
pub struct AltChunkPackager {
    created: Option<DateTime<Utc>>,
}

impl AltChunkPackager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the creation timestamp written to `docProps/core.xml`
    pub fn with_timestamp(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }
}

impl DocumentPackager for AltChunkPackager {
    fn pack(&self, doc: &RenderedDocument) -> ConversionResult<Vec<u8>> {
        let created = self.created.unwrap_or_else(Utc::now);
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let opt =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let parts: [(&str, String); 6] = [
            ("[Content_Types].xml", content_types_xml().to_string()),
            ("_rels/.rels", package_rels_xml().to_string()),
            ("docProps/core.xml", core_xml(doc.title.as_deref(), created)),
            ("word/document.xml", document_xml(&doc.layout)),
            ("word/_rels/document.xml.rels", document_rels_xml()),
            (CHUNK_PART, mhtml_wrap(&doc.html)),
        ];

        for (name, content) in &parts {
            debug!("writing part {} ({} bytes)", name, content.len());
            zip.start_file(*name, opt)?;
            zip.write_all(content.as_bytes())
                .map_err(|e| ConversionError::packaging(format!("{}: {}", name, e)))?;
        }

        let bytes = zip.finish()?.into_inner();
        info!("packaged docx: {} bytes", bytes.len());
        Ok(bytes)
    }
}

fn content_types_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Default Extension="mht" ContentType="message/rfc822"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
</Types>"#
}

fn package_rels_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>"#
}

fn document_rels_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/aFChunk" Target="afchunk.mht"/>
</Relationships>"#,
        CHUNK_REL_ID
    )
}

fn core_xml(title: Option<&str>, created: DateTime<Utc>) -> String {
    let stamp = created.format("%Y-%m-%dT%H:%M:%SZ");
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
"#,
    );
    if let Some(title) = title {
        let _ = writeln!(xml, "  <dc:title>{}</dc:title>", escape_xml(title));
    }
    xml.push_str("  <dc:creator>texdocx</dc:creator>\n");
    let _ = writeln!(
        xml,
        "  <dcterms:created xsi:type=\"dcterms:W3CDTF\">{}</dcterms:created>",
        stamp
    );
    let _ = writeln!(
        xml,
        "  <dcterms:modified xsi:type=\"dcterms:W3CDTF\">{}</dcterms:modified>",
        stamp
    );
    xml.push_str("</cp:coreProperties>");
    xml
}

fn twips(inches: f32) -> u32 {
    (inches * TWIPS_PER_INCH).round() as u32
}

fn document_xml(layout: &LayoutDirectives) -> String {
    let page = match layout.orientation {
        Orientation::Portrait => format!(
            "<w:pgSz w:w=\"{}\" w:h=\"{}\"/>",
            PAGE_WIDTH_TWIPS, PAGE_HEIGHT_TWIPS
        ),
        Orientation::Landscape => format!(
            "<w:pgSz w:w=\"{}\" w:h=\"{}\" w:orient=\"landscape\"/>",
            PAGE_HEIGHT_TWIPS, PAGE_WIDTH_TWIPS
        ),
    };
    let m = &layout.margins;
    let margins = format!(
        "<w:pgMar w:top=\"{}\" w:right=\"{}\" w:bottom=\"{}\" w:left=\"{}\" w:header=\"{}\" w:footer=\"{}\" w:gutter=\"0\"/>",
        twips(m.top),
        twips(m.right),
        twips(m.bottom),
        twips(m.left),
        HEADER_FOOTER_TWIPS,
        HEADER_FOOTER_TWIPS
    );
    let columns = format!(
        "<w:cols w:num=\"{}\" w:space=\"{}\"/>",
        layout.columns.max(1),
        COLUMN_GAP_TWIPS
    );

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <w:body>
    <w:altChunk r:id="{}"/>
    <w:sectPr>
      {}
      {}
      {}
    </w:sectPr>
  </w:body>
</w:document>"#,
        CHUNK_REL_ID, page, margins, columns
    )
}

/// Wrap HTML as a single-part MHTML message
fn mhtml_wrap(html: &str) -> String {
    format!(
        "MIME-Version: 1.0\r\n\
Content-Type: multipart/related; boundary=\"{b}\"\r\n\
\r\n\
--{b}\r\n\
Content-Type: text/html; charset=\"utf-8\"\r\n\
Content-Transfer-Encoding: quoted-printable\r\n\
Content-Location: file:///C:/afchunk.htm\r\n\
\r\n\
{body}\r\n\
--{b}--\r\n",
        b = MHT_BOUNDARY,
        body = quoted_printable(html)
    )
}

/// Quoted-printable encoding with CRLF hard breaks and soft wrapping
fn quoted_printable(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 4);
    let mut line_len = 0usize;
    let bytes = input.as_bytes();

    for (i, &b) in bytes.iter().enumerate() {
        if b == b'\n' {
            out.push_str("\r\n");
            line_len = 0;
            continue;
        }
        if b == b'\r' && bytes.get(i + 1) == Some(&b'\n') {
            continue;
        }

        let next_is_break = matches!(bytes.get(i + 1), None | Some(b'\r') | Some(b'\n'));
        let literal = match b {
            b'=' => false,
            b' ' | b'\t' => !next_is_break,
            33..=126 => true,
            _ => false,
        };

        let width = if literal { 1 } else { 3 };
        if line_len + width > QP_LINE_LIMIT {
            out.push_str("=\r\n");
            line_len = 0;
        }
        if literal {
            out.push(b as char);
        } else {
            let _ = write!(out, "={:02X}", b);
        }
        line_len += width;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::styles::OutputStyle;
    use chrono::TimeZone;
    use std::io::Read;
    use zip::ZipArchive;

    fn doc(style: OutputStyle, html: &str) -> RenderedDocument {
        RenderedDocument {
            html: html.to_string(),
            layout: *style.layout(),
            title: Some("Đề & bài".to_string()),
        }
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_package_parts() {
        let bytes = AltChunkPackager::new()
            .pack(&doc(OutputStyle::Standard, "<p>x</p>"))
            .unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "word/document.xml",
            "word/_rels/document.xml.rels",
            "word/afchunk.mht",
        ] {
            assert!(names.contains(&part), "missing {}", part);
        }
    }

    #[test]
    fn test_section_properties_portrait() {
        let bytes = AltChunkPackager::new()
            .pack(&doc(OutputStyle::Standard, ""))
            .unwrap();
        let xml = read_part(&bytes, "word/document.xml");
        assert!(xml.contains("<w:altChunk r:id=\"htmlChunk\"/>"));
        assert!(xml.contains("<w:pgSz w:w=\"12240\" w:h=\"15840\"/>"));
        assert!(xml.contains("w:top=\"1440\""));
        assert!(xml.contains("<w:cols w:num=\"1\""));
    }

    #[test]
    fn test_section_properties_landscape_and_columns() {
        let landscape = AltChunkPackager::new()
            .pack(&doc(OutputStyle::Landscape, ""))
            .unwrap();
        let xml = read_part(&landscape, "word/document.xml");
        assert!(xml.contains("w:w=\"15840\" w:h=\"12240\" w:orient=\"landscape\""));

        let two = AltChunkPackager::new()
            .pack(&doc(OutputStyle::TwoColumn, ""))
            .unwrap();
        let xml = read_part(&two, "word/document.xml");
        assert!(xml.contains("<w:cols w:num=\"2\""));
    }

    #[test]
    fn test_core_properties() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        let bytes = AltChunkPackager::new()
            .with_timestamp(created)
            .pack(&doc(OutputStyle::Standard, ""))
            .unwrap();
        let xml = read_part(&bytes, "docProps/core.xml");
        assert!(xml.contains("<dc:title>Đề &amp; bài</dc:title>"));
        assert!(xml.contains(">2024-05-01T08:30:00Z</dcterms:created>"));
    }

    #[test]
    fn test_chunk_relationship() {
        let bytes = AltChunkPackager::new()
            .pack(&doc(OutputStyle::Standard, ""))
            .unwrap();
        let rels = read_part(&bytes, "word/_rels/document.xml.rels");
        assert!(rels.contains("relationships/aFChunk"));
        assert!(rels.contains("Target=\"afchunk.mht\""));
    }

    #[test]
    fn test_mhtml_part_encodes_html() {
        let bytes = AltChunkPackager::new()
            .pack(&doc(OutputStyle::Standard, "<p style=\"a\">Câu</p>"))
            .unwrap();
        let mht = read_part(&bytes, "word/afchunk.mht");
        assert!(mht.contains("boundary=\"----=mhtDocumentPart\""));
        assert!(mht.contains("<p style=3D\"a\">C=C3=A2u</p>"));
        assert!(mht.trim_end().ends_with("------=mhtDocumentPart--"));
    }

    #[test]
    fn test_quoted_printable_wrapping() {
        let long = "a".repeat(200);
        let encoded = quoted_printable(&long);
        assert!(encoded.lines().all(|l| l.len() <= 76));
        assert_eq!(encoded.replace("=\r\n", ""), long);
    }

    #[test]
    fn test_quoted_printable_trailing_space() {
        assert_eq!(quoted_printable("a \nb"), "a=20\r\nb");
        assert_eq!(quoted_printable("x=y"), "x=3Dy");
    }

    #[test]
    fn test_closure_packager() {
        let packager = |d: &RenderedDocument| -> ConversionResult<Vec<u8>> {
            Ok(d.html.as_bytes().to_vec())
        };
        assert_eq!(packager.pack(&doc(OutputStyle::Draft, "abc")).unwrap(), b"abc");
    }
}
