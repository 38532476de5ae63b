//! Format-neutral document model and its WordprocessingML (`.docx`) writer.
//!
//! Documents are assembled as a flat list of [`Block`]s and serialized into a
//! minimal OPC package: content types, package relationships, the main document
//! part and a styles part.

use crate::errors::Result;
use quick_xml::escape::escape;
use std::borrow::Cow;
use std::fmt::Write as _;
use std::io::{Cursor, Write as _};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Printable width of an A4 page with 1" margins, in twentieths of a point.
const TEXT_WIDTH_TWIPS: usize = 9026;

/// One block-level element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Heading; level 0 is the document title.
    Heading {
        /// 0, 1 or 2
        level: u8,
        /// Heading text
        text: String,
        /// Center the heading
        centered: bool,
    },
    /// Body text; `\n` becomes a line break.
    Paragraph(String),
    /// Grid table with a bold header row.
    Table {
        /// Column headers
        headers: Vec<String>,
        /// Body rows, each as wide as `headers`
        rows: Vec<Vec<String>>,
    },
    /// Empty spacer paragraph.
    Blank,
    /// Forces the following blocks onto a new page.
    PageBreak,
}

/// An ordered sequence of blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks in order.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Appends a left-aligned heading.
    pub fn heading(&mut self, level: u8, text: impl Into<String>) -> &mut Self {
        self.push(Block::Heading {
            level,
            text: text.into(),
            centered: false,
        })
    }

    /// Appends a centered heading.
    pub fn centered_heading(&mut self, level: u8, text: impl Into<String>) -> &mut Self {
        self.push(Block::Heading {
            level,
            text: text.into(),
            centered: true,
        })
    }

    /// Appends a paragraph.
    pub fn paragraph(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Block::Paragraph(text.into()))
    }

    /// Appends an empty paragraph.
    pub fn blank(&mut self) -> &mut Self {
        self.push(Block::Blank)
    }

    /// Appends a table.
    pub fn table<H: Into<String>>(
        &mut self,
        headers: impl IntoIterator<Item = H>,
        rows: Vec<Vec<String>>,
    ) -> &mut Self {
        self.push(Block::Table {
            headers: headers.into_iter().map(Into::into).collect(),
            rows,
        })
    }

    /// Appends a page break.
    pub fn page_break(&mut self) -> &mut Self {
        self.push(Block::PageBreak)
    }

    fn push(&mut self, block: Block) -> &mut Self {
        self.blocks.push(block);
        self
    }

    /// Serializes the document as a `.docx` package.
    pub fn to_docx(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, contents) in [
            ("[Content_Types].xml", CONTENT_TYPES_XML),
            ("_rels/.rels", PACKAGE_RELS_XML),
            ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML),
            ("word/styles.xml", STYLES_XML),
        ] {
            zip.start_file(name, options)?;
            zip.write_all(contents.as_bytes())?;
        }

        zip.start_file("word/document.xml", options)?;
        zip.write_all(self.document_xml().as_bytes())?;

        Ok(zip.finish()?.into_inner())
    }

    /// The `word/document.xml` part.
    #[must_use]
    pub fn document_xml(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
        );
        for block in &self.blocks {
            write_block(&mut xml, block);
        }
        xml.push_str(
            r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr></w:body></w:document>"#,
        );
        xml
    }
}

fn write_block(xml: &mut String, block: &Block) {
    match block {
        Block::Heading {
            level,
            text,
            centered,
        } => {
            let style = match level {
                0 => "Title",
                1 => "Heading1",
                _ => "Heading2",
            };
            let _ = write!(xml, r#"<w:p><w:pPr><w:pStyle w:val="{style}"/>"#);
            if *centered {
                xml.push_str(r#"<w:jc w:val="center"/>"#);
            }
            xml.push_str("</w:pPr>");
            write_run(xml, text, false);
            xml.push_str("</w:p>");
        }
        Block::Paragraph(text) => {
            xml.push_str("<w:p>");
            if !text.is_empty() {
                write_run(xml, text, false);
            }
            xml.push_str("</w:p>");
        }
        Block::Table { headers, rows } => write_table(xml, headers, rows),
        Block::Blank => xml.push_str("<w:p/>"),
        Block::PageBreak => xml.push_str(r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#),
    }
}

/// Escapes `text` for XML character data, dropping control characters XML 1.0
/// does not allow.
pub(crate) fn escape_text(text: &str) -> Cow<'_, str> {
    let allowed = |c: char| c >= ' ' || matches!(c, '\t' | '\n' | '\r');
    if text.chars().all(allowed) {
        escape(text)
    } else {
        let cleaned: String = text.chars().filter(|c| allowed(*c)).collect();
        Cow::Owned(escape(&cleaned).into_owned())
    }
}

fn write_run(xml: &mut String, text: &str, bold: bool) {
    xml.push_str("<w:r>");
    if bold {
        xml.push_str("<w:rPr><w:b/></w:rPr>");
    }
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            xml.push_str("<w:br/>");
        }
        let _ = write!(xml, r#"<w:t xml:space="preserve">{}</w:t>"#, escape_text(line));
    }
    xml.push_str("</w:r>");
}

fn write_table(xml: &mut String, headers: &[String], rows: &[Vec<String>]) {
    let column_width = TEXT_WIDTH_TWIPS / headers.len().max(1);

    xml.push_str(
        r#"<w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/><w:tblW w:w="0" w:type="auto"/></w:tblPr><w:tblGrid>"#,
    );
    for _ in headers {
        let _ = write!(xml, r#"<w:gridCol w:w="{column_width}"/>"#);
    }
    xml.push_str("</w:tblGrid>");

    write_row(xml, headers, column_width, true);
    for row in rows {
        write_row(xml, row, column_width, false);
    }
    xml.push_str("</w:tbl>");
}

fn write_row(xml: &mut String, cells: &[String], column_width: usize, bold: bool) {
    xml.push_str("<w:tr>");
    for cell in cells {
        let _ = write!(
            xml,
            r#"<w:tc><w:tcPr><w:tcW w:w="{column_width}" w:type="dxa"/></w:tcPr><w:p>"#
        );
        write_run(xml, cell, bold);
        xml.push_str("</w:p></w:tc>");
    }
    xml.push_str("</w:tr>");
}

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/><w:sz w:val="22"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="120"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:spacing w:before="240" w:after="240"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:color w:val="17365D"/><w:sz w:val="36"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:keepNext/><w:spacing w:before="360" w:after="120"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:color w:val="365F91"/><w:sz w:val="28"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:keepNext/><w:spacing w:before="200" w:after="80"/><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:color w:val="4F81BD"/><w:sz w:val="26"/></w:rPr></w:style><w:style w:type="table" w:default="1" w:styleId="TableNormal"><w:name w:val="Normal Table"/><w:tblPr><w:tblInd w:w="0" w:type="dxa"/><w:tblCellMar><w:top w:w="0" w:type="dxa"/><w:left w:w="108" w:type="dxa"/><w:bottom w:w="0" w:type="dxa"/><w:right w:w="108" w:type="dxa"/></w:tblCellMar></w:tblPr></w:style><w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/><w:basedOn w:val="TableNormal"/><w:pPr><w:spacing w:after="0"/></w:pPr><w:tblPr><w:tblBorders><w:top w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:left w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:bottom w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:right w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideH w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideV w:val="single" w:sz="4" w:space="0" w:color="auto"/></w:tblBorders></w:tblPr></w:style></w:styles>"#;
