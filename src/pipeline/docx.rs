//! DOCX serialisation: block list + letterhead → `.docx` bytes.
//!
//! A `.docx` file is a zip of WordprocessingML parts. This module renders
//! each part as a string and packs them in a fixed order:
//!
//! ```text
//! [Content_Types].xml
//! _rels/.rels
//! docProps/core.xml
//! word/document.xml            body blocks + section referencing the header
//! word/styles.xml              Normal, Heading1–3, ListParagraph, TableGrid
//! word/numbering.xml           one bullet list definition
//! word/header1.xml             centred letterhead, repeated on every page
//! word/_rels/document.xml.rels
//! word/_rels/header1.xml.rels
//! word/media/…                 letterhead + one file per embedded image
//! ```
//!
//! Zip entries carry a fixed timestamp, so the same blocks always produce
//! the same bytes.

use crate::error::Html2DocxError;
use crate::model::{
    DocumentBlock, ImageType, ResolvedImage, StyledRun, TableCell, LETTERHEAD_HEIGHT,
    LETTERHEAD_WIDTH, TABLE_CELL_WIDTH_PCT,
};
use std::fmt::Write as _;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// English Metric Units per pixel at 96 DPI.
const EMU_PER_PIXEL: u64 = 9525;

/// A4 text width in twentieths of a point (page width minus 1" margins).
const TEXT_WIDTH_TWIPS: u32 = 11906 - 2 * 1440;

const REL_STYLES: &str = "rId1";
const REL_NUMBERING: &str = "rId2";
const REL_HEADER: &str = "rId3";
const FIRST_IMAGE_REL: u32 = 4;

const BULLET_NUM_ID: u32 = 1;

/// Document-level properties written to `docProps/core.xml`.
#[derive(Debug, Clone, Default)]
pub struct CoreProperties<'a> {
    pub title: &'a str,
    pub creator: Option<&'a str>,
}

struct MediaPart<'a> {
    rel_id: String,
    file_name: String,
    data: &'a [u8],
}

/// Collects media parts and drawing ids while the body is rendered.
struct BodyRenderer<'a> {
    media: Vec<MediaPart<'a>>,
    next_drawing_id: u32,
}

/// Serialise `blocks` into a complete `.docx` package.
///
/// `blocks` is written as-is; the caller is responsible for prepending the
/// title heading.
pub fn write_docx<'a>(
    blocks: impl IntoIterator<Item = &'a DocumentBlock>,
    letterhead: &ResolvedImage,
    props: &CoreProperties<'_>,
) -> Result<Vec<u8>, Html2DocxError> {
    let mut renderer = BodyRenderer {
        media: Vec::new(),
        // id 1 is the letterhead drawing in the header
        next_drawing_id: 2,
    };
    let mut body = String::new();
    for block in blocks {
        renderer.block(&mut body, block);
    }

    let letterhead_name = format!("letterhead.{}", letterhead.image_type.extension());

    let mut parts: Vec<(String, Vec<u8>)> = vec![
        ("[Content_Types].xml".into(), content_types_xml().into_bytes()),
        ("_rels/.rels".into(), package_rels_xml().as_bytes().to_vec()),
        ("docProps/core.xml".into(), core_xml(props).into_bytes()),
        ("word/document.xml".into(), document_xml(&body).into_bytes()),
        ("word/styles.xml".into(), styles_xml().as_bytes().to_vec()),
        ("word/numbering.xml".into(), numbering_xml().as_bytes().to_vec()),
        ("word/header1.xml".into(), header_xml().into_bytes()),
        (
            "word/_rels/document.xml.rels".into(),
            document_rels_xml(&renderer.media).into_bytes(),
        ),
        (
            "word/_rels/header1.xml.rels".into(),
            header_rels_xml(&letterhead_name).into_bytes(),
        ),
        (format!("word/media/{letterhead_name}"), letterhead.data.clone()),
    ];
    for m in &renderer.media {
        parts.push((format!("word/media/{}", m.file_name), m.data.to_vec()));
    }

    let bytes = pack(&parts)?;
    debug!(
        "Packed {} parts ({} images) into {} bytes",
        parts.len(),
        renderer.media.len(),
        bytes.len()
    );
    Ok(bytes)
}

fn serialization(e: impl std::fmt::Display) -> Html2DocxError {
    Html2DocxError::Serialization(e.to_string())
}

fn pack(parts: &[(String, Vec<u8>)]) -> Result<Vec<u8>, Html2DocxError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let opts = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    for (name, data) in parts {
        zip.start_file(name.as_str(), opts).map_err(serialization)?;
        zip.write_all(data).map_err(serialization)?;
    }
    let cursor = zip.finish().map_err(serialization)?;
    Ok(cursor.into_inner())
}

// ── Body rendering ───────────────────────────────────────────────────────

impl<'a> BodyRenderer<'a> {
    fn block(&mut self, out: &mut String, block: &'a DocumentBlock) {
        match block {
            DocumentBlock::Heading { level, text } => {
                let style = format!("Heading{}", (*level).clamp(1, 3));
                paragraph(out, Some(style.as_str()), None, &[StyledRun::plain(text.as_str())]);
            }
            DocumentBlock::Paragraph { runs } => paragraph(out, None, None, runs),
            DocumentBlock::ListItem { text, bullet, .. } => {
                let runs = [StyledRun::plain(text.as_str())];
                if *bullet {
                    paragraph(out, Some("ListParagraph"), Some(BULLET_NUM_ID), &runs);
                } else {
                    paragraph(out, None, None, &runs);
                }
            }
            DocumentBlock::Image {
                image,
                width,
                height,
                centered,
            } => {
                let rel_id = format!("rId{}", FIRST_IMAGE_REL as usize + self.media.len());
                let file_name = format!(
                    "image{}.{}",
                    self.media.len() + 1,
                    image.image_type.extension()
                );
                let drawing = drawing_xml(&rel_id, self.next_drawing_id, &file_name, *width, *height);
                self.next_drawing_id += 1;
                self.media.push(MediaPart {
                    rel_id,
                    file_name,
                    data: &image.data,
                });

                out.push_str("<w:p>");
                if *centered {
                    out.push_str("<w:pPr><w:jc w:val=\"center\"/></w:pPr>");
                }
                let _ = write!(out, "<w:r>{drawing}</w:r></w:p>");
            }
            DocumentBlock::Table { rows } => table(out, rows),
            DocumentBlock::LineBreak => out.push_str("<w:p/>"),
        }
    }
}

fn paragraph(
    out: &mut String,
    style: Option<&str>,
    num_id: Option<u32>,
    runs: &[StyledRun],
) {
    out.push_str("<w:p>");
    if style.is_some() || num_id.is_some() {
        out.push_str("<w:pPr>");
        if let Some(style) = style {
            let _ = write!(out, "<w:pStyle w:val=\"{style}\"/>");
        }
        if let Some(num_id) = num_id {
            let _ = write!(
                out,
                "<w:numPr><w:ilvl w:val=\"0\"/><w:numId w:val=\"{num_id}\"/></w:numPr>"
            );
        }
        out.push_str("</w:pPr>");
    }
    for run in runs {
        run_xml(out, run);
    }
    out.push_str("</w:p>");
}

fn run_xml(out: &mut String, run: &StyledRun) {
    if run.text.is_empty() {
        return;
    }
    out.push_str("<w:r>");
    if run.bold || run.italic || run.underline {
        out.push_str("<w:rPr>");
        if run.bold {
            out.push_str("<w:b/>");
        }
        if run.italic {
            out.push_str("<w:i/>");
        }
        if run.underline {
            out.push_str("<w:u w:val=\"single\"/>");
        }
        out.push_str("</w:rPr>");
    }
    let _ = write!(
        out,
        "<w:t xml:space=\"preserve\">{}</w:t></w:r>",
        xml_escape(&run.text)
    );
}

fn table(out: &mut String, rows: &[Vec<TableCell>]) {
    // A table without rows is not valid WordprocessingML.
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return;
    }

    out.push_str(
        "<w:tbl><w:tblPr><w:tblStyle w:val=\"TableGrid\"/>\
         <w:tblW w:w=\"5000\" w:type=\"pct\"/><w:tblLayout w:type=\"fixed\"/></w:tblPr><w:tblGrid>",
    );
    for _ in 0..columns {
        let _ = write!(
            out,
            "<w:gridCol w:w=\"{}\"/>",
            TEXT_WIDTH_TWIPS * TABLE_CELL_WIDTH_PCT / 100
        );
    }
    out.push_str("</w:tblGrid>");

    for row in rows {
        out.push_str("<w:tr>");
        for cell in row {
            // pct widths are expressed in fiftieths of a percent
            let _ = write!(
                out,
                "<w:tc><w:tcPr><w:tcW w:w=\"{}\" w:type=\"pct\"/></w:tcPr>",
                cell.width_pct * 50
            );
            if cell.paragraphs.is_empty() {
                out.push_str("<w:p/>");
            }
            for runs in &cell.paragraphs {
                paragraph(out, None, None, runs);
            }
            out.push_str("</w:tc>");
        }
        out.push_str("</w:tr>");
    }
    out.push_str("</w:tbl>");
}

fn drawing_xml(rel_id: &str, drawing_id: u32, name: &str, width_px: u32, height_px: u32) -> String {
    let cx = u64::from(width_px) * EMU_PER_PIXEL;
    let cy = u64::from(height_px) * EMU_PER_PIXEL;
    let name = xml_escape(name);
    format!(
        "<w:drawing><wp:inline distT=\"0\" distB=\"0\" distL=\"0\" distR=\"0\">\
<wp:extent cx=\"{cx}\" cy=\"{cy}\"/>\
<wp:docPr id=\"{drawing_id}\" name=\"Picture {drawing_id}\"/>\
<wp:cNvGraphicFramePr><a:graphicFrameLocks xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" noChangeAspect=\"1\"/></wp:cNvGraphicFramePr>\
<a:graphic xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\">\
<a:graphicData uri=\"http://schemas.openxmlformats.org/drawingml/2006/picture\">\
<pic:pic xmlns:pic=\"http://schemas.openxmlformats.org/drawingml/2006/picture\">\
<pic:nvPicPr><pic:cNvPr id=\"{drawing_id}\" name=\"{name}\"/><pic:cNvPicPr/></pic:nvPicPr>\
<pic:blipFill><a:blip r:embed=\"{rel_id}\"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>\
<pic:spPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>\
<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></pic:spPr>\
</pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing>"
    )
}

/// Escape markup characters and drop code points XML 1.0 cannot carry.
fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(ch),
            c if (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            _ => out.push(ch),
        }
    }
    out
}

// ── Package parts ────────────────────────────────────────────────────────

const NS_DECLS: &str = "xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\" \
xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
xmlns:wp=\"http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing\"";

fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document {NS_DECLS}><w:body>{body}<w:sectPr><w:headerReference w:type="default" r:id="{REL_HEADER}"/><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="708" w:footer="708" w:gutter="0"/><w:cols w:space="708"/><w:docGrid w:linePitch="360"/></w:sectPr></w:body></w:document>"#
    )
}

fn header_xml() -> String {
    let drawing = drawing_xml("rId1", 1, "letterhead", LETTERHEAD_WIDTH, LETTERHEAD_HEIGHT);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:hdr {NS_DECLS}><w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r>{drawing}</w:r></w:p></w:hdr>"#
    )
}

fn content_types_xml() -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    out.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    out.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    for t in ImageType::ALL {
        let _ = write!(
            out,
            r#"<Default Extension="{}" ContentType="{}"/>"#,
            t.extension(),
            t.mime_type()
        );
    }
    out.push_str(r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#);
    out.push_str(r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#);
    out.push_str(r#"<Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/>"#);
    out.push_str(r#"<Override PartName="/word/header1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml"/>"#);
    out.push_str(r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#);
    out.push_str("</Types>");
    out
}

fn package_rels_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#
}

fn core_xml(props: &CoreProperties<'_>) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
    );
    let _ = write!(out, "<dc:title>{}</dc:title>", xml_escape(props.title));
    if let Some(creator) = props.creator {
        let _ = write!(out, "<dc:creator>{}</dc:creator>", xml_escape(creator));
    }
    out.push_str("</cp:coreProperties>");
    out
}

fn document_rels_xml(media: &[MediaPart<'_>]) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    let _ = write!(
        out,
        r#"<Relationship Id="{REL_STYLES}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#
    );
    let _ = write!(
        out,
        r#"<Relationship Id="{REL_NUMBERING}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>"#
    );
    let _ = write!(
        out,
        r#"<Relationship Id="{REL_HEADER}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header1.xml"/>"#
    );
    for m in media {
        let _ = write!(
            out,
            r#"<Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/{}"/>"#,
            m.rel_id, m.file_name
        );
    }
    out.push_str("</Relationships>");
    out
}

fn header_rels_xml(letterhead_name: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/{letterhead_name}"/></Relationships>"#
    )
}

fn styles_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
    <w:qFormat/>
    <w:pPr><w:spacing w:after="120"/></w:pPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading1">
    <w:name w:val="heading 1"/>
    <w:basedOn w:val="Normal"/>
    <w:next w:val="Normal"/>
    <w:uiPriority w:val="9"/>
    <w:qFormat/>
    <w:pPr><w:keepNext/><w:spacing w:before="360" w:after="120"/><w:outlineLvl w:val="0"/></w:pPr>
    <w:rPr><w:b/><w:sz w:val="32"/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading2">
    <w:name w:val="heading 2"/>
    <w:basedOn w:val="Normal"/>
    <w:next w:val="Normal"/>
    <w:uiPriority w:val="9"/>
    <w:qFormat/>
    <w:pPr><w:keepNext/><w:spacing w:before="240" w:after="120"/><w:outlineLvl w:val="1"/></w:pPr>
    <w:rPr><w:b/><w:sz w:val="28"/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading3">
    <w:name w:val="heading 3"/>
    <w:basedOn w:val="Normal"/>
    <w:next w:val="Normal"/>
    <w:uiPriority w:val="9"/>
    <w:qFormat/>
    <w:pPr><w:keepNext/><w:spacing w:before="200" w:after="100"/><w:outlineLvl w:val="2"/></w:pPr>
    <w:rPr><w:b/><w:sz w:val="24"/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="ListParagraph">
    <w:name w:val="List Paragraph"/>
    <w:basedOn w:val="Normal"/>
    <w:uiPriority w:val="34"/>
    <w:qFormat/>
    <w:pPr><w:ind w:left="720"/><w:contextualSpacing/></w:pPr>
  </w:style>
  <w:style w:type="table" w:styleId="TableGrid">
    <w:name w:val="Table Grid"/>
    <w:uiPriority w:val="39"/>
    <w:tblPr>
      <w:tblBorders>
        <w:top w:val="single" w:sz="4" w:space="0" w:color="auto"/>
        <w:left w:val="single" w:sz="4" w:space="0" w:color="auto"/>
        <w:bottom w:val="single" w:sz="4" w:space="0" w:color="auto"/>
        <w:right w:val="single" w:sz="4" w:space="0" w:color="auto"/>
        <w:insideH w:val="single" w:sz="4" w:space="0" w:color="auto"/>
        <w:insideV w:val="single" w:sz="4" w:space="0" w:color="auto"/>
      </w:tblBorders>
    </w:tblPr>
  </w:style>
</w:styles>"#
}

fn numbering_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:abstractNum w:abstractNumId="0">
    <w:multiLevelType w:val="singleLevel"/>
    <w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="•"/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:lvl>
  </w:abstractNum>
  <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
</w:numbering>"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn letterhead() -> ResolvedImage {
        ResolvedImage::new(b"\x89PNG\r\n\x1a\nfake".to_vec(), ImageType::Png)
    }

    fn read_part(docx: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(docx)).expect("valid zip");
        let mut part = archive.by_name(name).expect("part present");
        let mut s = String::new();
        part.read_to_string(&mut s).expect("utf-8 part");
        s
    }

    fn props() -> CoreProperties<'static> {
        CoreProperties {
            title: "Weekly Meeting",
            creator: Some("Secretariat"),
        }
    }

    #[test]
    fn escapes_markup_and_drops_control_chars() {
        assert_eq!(xml_escape("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&apos;");
        assert_eq!(xml_escape("x\u{0}y\u{1b}z\tw"), "xyz\tw");
    }

    #[test]
    fn runs_carry_style_flags() {
        let mut out = String::new();
        run_xml(
            &mut out,
            &StyledRun {
                text: "all".into(),
                bold: true,
                italic: true,
                underline: true,
            },
        );
        assert_eq!(
            out,
            "<w:r><w:rPr><w:b/><w:i/><w:u w:val=\"single\"/></w:rPr><w:t xml:space=\"preserve\">all</w:t></w:r>"
        );
    }

    #[test]
    fn header_references_letterhead_at_fixed_size() {
        let docx = write_docx(std::iter::empty(), &letterhead(), &props()).expect("write");
        let header = read_part(&docx, "word/header1.xml");
        assert!(header.contains(r#"<w:jc w:val="center"/>"#));
        assert!(header.contains(&format!(
            r#"cx="{}" cy="{}""#,
            500 * EMU_PER_PIXEL,
            75 * EMU_PER_PIXEL
        )));
        let rels = read_part(&docx, "word/_rels/header1.xml.rels");
        assert!(rels.contains("media/letterhead.png"));
        let doc = read_part(&docx, "word/document.xml");
        assert!(doc.contains(r#"<w:headerReference w:type="default" r:id="rId3"/>"#));
    }

    #[test]
    fn images_get_sequential_relationships() {
        let blocks = vec![
            DocumentBlock::Image {
                image: ResolvedImage::new(vec![1], ImageType::Jpg),
                width: 300,
                height: 200,
                centered: true,
            },
            DocumentBlock::Image {
                image: ResolvedImage::new(vec![2], ImageType::Gif),
                width: 10,
                height: 20,
                centered: true,
            },
        ];
        let docx = write_docx(&blocks, &letterhead(), &props()).expect("write");
        let rels = read_part(&docx, "word/_rels/document.xml.rels");
        assert!(rels.contains(r#"Id="rId4""#) && rels.contains("media/image1.jpg"));
        assert!(rels.contains(r#"Id="rId5""#) && rels.contains("media/image2.gif"));

        let mut archive = zip::ZipArchive::new(Cursor::new(&docx[..])).expect("zip");
        let mut data = Vec::new();
        archive
            .by_name("word/media/image2.gif")
            .expect("media part")
            .read_to_end(&mut data)
            .expect("read");
        assert_eq!(data, vec![2]);
    }

    #[test]
    fn bullets_use_numbering_but_ordered_items_do_not() {
        let blocks = vec![
            DocumentBlock::ListItem {
                text: "bullet".into(),
                bullet: true,
                ordinal: 1,
            },
            DocumentBlock::ListItem {
                text: "plain".into(),
                bullet: false,
                ordinal: 1,
            },
        ];
        let docx = write_docx(&blocks, &letterhead(), &props()).expect("write");
        let doc = read_part(&docx, "word/document.xml");
        assert_eq!(doc.matches("<w:numPr>").count(), 1);
        assert!(doc.contains("<w:p><w:r><w:t xml:space=\"preserve\">plain</w:t></w:r></w:p>"));
    }

    #[test]
    fn table_cells_are_quarter_width() {
        let cell = |t: &str| TableCell {
            paragraphs: vec![vec![StyledRun::plain(t)]],
            width_pct: 25,
        };
        let blocks = vec![DocumentBlock::Table {
            rows: vec![vec![cell("a"), cell("b")]],
        }];
        let docx = write_docx(&blocks, &letterhead(), &props()).expect("write");
        let doc = read_part(&docx, "word/document.xml");
        assert_eq!(doc.matches(r#"<w:tcW w:w="1250" w:type="pct"/>"#).count(), 2);
        assert_eq!(doc.matches("<w:gridCol ").count(), 2);
    }

    #[test]
    fn rowless_table_is_omitted() {
        let docx = write_docx(
            &[DocumentBlock::Table { rows: vec![] }],
            &letterhead(),
            &props(),
        )
        .expect("write");
        assert!(!read_part(&docx, "word/document.xml").contains("<w:tbl>"));
    }

    #[test]
    fn core_properties_hold_title() {
        let docx = write_docx(std::iter::empty(), &letterhead(), &props()).expect("write");
        let core = read_part(&docx, "docProps/core.xml");
        assert!(core.contains("<dc:title>Weekly Meeting</dc:title>"));
        assert!(core.contains("<dc:creator>Secretariat</dc:creator>"));
    }

    #[test]
    fn output_is_deterministic() {
        let blocks = vec![DocumentBlock::Paragraph {
            runs: vec![StyledRun::plain("same")],
        }];
        let a = write_docx(&blocks, &letterhead(), &props()).expect("write");
        let b = write_docx(&blocks, &letterhead(), &props()).expect("write");
        assert_eq!(a, b);
    }
}
