//! Integration tests for edgequake-html2docx.
//!
//! No network access is needed: remote images go through an in-memory
//! resolver, and letterheads are written to a temporary directory.
//!
//! Run with:
//!   cargo test --test conversion -- --nocapture

use edgequake_html2docx::{
    convert_sync, convert_to_file, convert_with_resolver, extract_blocks, ConversionConfig,
    ConversionProgressCallback, DocumentBlock, Html2DocxError, ImageError, ImageResolver,
    ImageType, ResolvedImage, StyledRun,
};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Serves a fixed set of URLs from memory; anything else fails to download.
#[derive(Default)]
struct MockResolver {
    images: HashMap<String, ResolvedImage>,
}

impl MockResolver {
    fn with(mut self, url: &str, data: &[u8], image_type: ImageType) -> Self {
        self.images
            .insert(url.to_string(), ResolvedImage::new(data.to_vec(), image_type));
        self
    }
}

impl ImageResolver for MockResolver {
    async fn resolve(&self, source: &str) -> Result<ResolvedImage, ImageError> {
        self.images
            .get(source)
            .cloned()
            .ok_or_else(|| ImageError::HttpStatus {
                url: source.to_string(),
                status: 404,
            })
    }
}

/// Write a small PNG letterhead into a fresh temp dir.
fn letterhead_dir() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("letterhead.png");
    image::RgbImage::from_pixel(20, 3, image::Rgb([23, 55, 94]))
        .save(&path)
        .expect("write letterhead");
    (dir, path)
}

fn config_for(letterhead: &Path) -> ConversionConfig {
    ConversionConfig::builder()
        .letterhead_path(letterhead)
        .build()
        .expect("config")
}

fn part(docx: &[u8], name: &str) -> Vec<u8> {
    let mut archive = zip::ZipArchive::new(Cursor::new(docx)).expect("docx is a zip");
    let mut data = Vec::new();
    archive
        .by_name(name)
        .unwrap_or_else(|_| panic!("missing part {name}"))
        .read_to_end(&mut data)
        .expect("read part");
    data
}

fn part_str(docx: &[u8], name: &str) -> String {
    String::from_utf8(part(docx, name)).expect("utf-8 part")
}

fn convert_blocking(
    html: &str,
    title: &str,
    config: &ConversionConfig,
    resolver: &MockResolver,
) -> Result<edgequake_html2docx::ConversionOutput, Html2DocxError> {
    tokio_test::block_on(convert_with_resolver(html, title, config, resolver))
}

// ── Document structure ───────────────────────────────────────────────────────

#[test]
fn weekly_meeting_document() {
    let (_dir, letterhead) = letterhead_dir();
    let output = convert_blocking(
        "<h1>Agenda</h1><p>Discuss <b>budget</b> items</p>",
        "Weekly Meeting",
        &config_for(&letterhead),
        &MockResolver::default(),
    )
    .expect("convert");

    assert_eq!(output.stats.total_blocks, 3);
    assert_eq!(output.stats.output_bytes, output.docx.len());

    let doc = part_str(&output.docx, "word/document.xml");
    let title = doc.find("Weekly Meeting").expect("title");
    let agenda = doc.find("Agenda").expect("heading");
    let budget = doc.find("budget").expect("bold run");
    assert!(title < agenda && agenda < budget);
    assert!(doc.contains(
        r#"<w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">budget</w:t></w:r>"#
    ));
}

#[test]
fn every_page_carries_the_letterhead() {
    let (_dir, letterhead) = letterhead_dir();
    let output = convert_blocking(
        "<p>x</p>",
        "Memo",
        &config_for(&letterhead),
        &MockResolver::default(),
    )
    .expect("convert");

    let header = part_str(&output.docx, "word/header1.xml");
    assert!(header.contains(r#"<w:jc w:val="center"/>"#));
    // 500 × 75 px in EMU
    assert!(header.contains(r#"cx="4762500" cy="714375""#));
    assert_eq!(
        part(&output.docx, "word/media/letterhead.png"),
        std::fs::read(&letterhead).expect("read letterhead")
    );

    let doc = part_str(&output.docx, "word/document.xml");
    assert!(doc.contains(r#"<w:headerReference w:type="default" r:id="rId3"/>"#));
}

#[test]
fn lists_and_tables() {
    let (_dir, letterhead) = letterhead_dir();
    let output = convert_blocking(
        "<ul><li>A</li><li>B</li></ul><ol><li>one</li></ol>\
         <table><tr><td>1</td><td>2</td><td>3</td><td>4</td><td>5</td></tr></table>",
        "Lists",
        &config_for(&letterhead),
        &MockResolver::default(),
    )
    .expect("convert");

    let doc = part_str(&output.docx, "word/document.xml");
    assert_eq!(doc.matches("<w:numPr>").count(), 2, "only bullets are numbered");
    assert_eq!(doc.matches(r#"<w:tcW w:w="1250" w:type="pct"/>"#).count(), 5);
    assert!(part_str(&output.docx, "word/numbering.xml").contains(r#"w:val="bullet""#));
}

// ── Images ───────────────────────────────────────────────────────────────────

#[test]
fn images_are_embedded_in_order() {
    let (_dir, letterhead) = letterhead_dir();
    let resolver = MockResolver::default()
        .with("https://img.example/logo.jpg", b"jpeg-bytes", ImageType::Jpg)
        .with("https://img.example/chart.gif", b"gif-bytes", ImageType::Gif);
    let output = convert_blocking(
        r#"<div><img src="https://img.example/logo.jpg" width="120" height="40"></div>
           <p>caption</p>
           <img src="https://img.example/chart.gif">"#,
        "Report",
        &config_for(&letterhead),
        &resolver,
    )
    .expect("convert");

    assert_eq!(output.stats.images_embedded, 2);
    assert_eq!(output.stats.images_failed, 0);
    assert_eq!(part(&output.docx, "word/media/image1.jpg"), b"jpeg-bytes");
    assert_eq!(part(&output.docx, "word/media/image2.gif"), b"gif-bytes");

    let doc = part_str(&output.docx, "word/document.xml");
    // 120 × 40 px declared, 300 × 200 px default
    assert!(doc.contains(r#"cx="1143000" cy="381000""#));
    assert!(doc.contains(r#"cx="2857500" cy="1905000""#));
    assert!(doc.find(r#"r:embed="rId4""#) < doc.find("caption"));
}

#[test]
fn broken_image_does_not_abort_conversion() {
    let (_dir, letterhead) = letterhead_dir();
    let output = convert_blocking(
        r#"<p>before</p><img src="https://bad.example/x.png"><p>after</p>"#,
        "Partial",
        &config_for(&letterhead),
        &MockResolver::default(),
    )
    .expect("convert");

    assert_eq!(output.stats.images_failed, 1);
    assert_eq!(output.stats.images_embedded, 0);
    assert_eq!(output.stats.total_blocks, 3);
    let doc = part_str(&output.docx, "word/document.xml");
    assert!(!doc.contains("<w:drawing>"));
    assert!(doc.find("before") < doc.find("after"));
}

#[test]
fn inline_data_uri_image() {
    use base64::Engine as _;

    let (_dir, letterhead) = letterhead_dir();
    let png = std::fs::read(&letterhead).expect("read png");
    let uri = format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&png)
    );
    let resolver = edgequake_html2docx::HttpImageResolver::new(5).expect("client");
    let output = tokio_test::block_on(convert_with_resolver(
        &format!(r#"<img src="{uri}">"#),
        "Inline",
        &config_for(&letterhead),
        &resolver,
    ))
    .expect("convert");

    assert_eq!(output.stats.images_embedded, 1);
    assert_eq!(part(&output.docx, "word/media/image1.png"), png);
}

// ── Fatal errors ─────────────────────────────────────────────────────────────

#[test]
fn missing_letterhead_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = convert_blocking(
        "<p>x</p>",
        "Memo",
        &config_for(&dir.path().join("nope.png")),
        &MockResolver::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Html2DocxError::LetterheadUnavailable { .. }));
}

#[test]
fn corrupt_letterhead_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("letterhead.png");
    std::fs::write(&path, b"not an image").expect("write");
    let err = convert_blocking("<p>x</p>", "Memo", &config_for(&path), &MockResolver::default())
        .unwrap_err();
    assert!(matches!(err, Html2DocxError::LetterheadInvalid { .. }));
}

#[test]
fn bundled_letterhead_loads() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/letterhead.png");
    let output = convert_blocking("<p>x</p>", "Memo", &config_for(&path), &MockResolver::default())
        .expect("convert");
    assert!(!output.docx.is_empty());
}

// ── Determinism & edge cases ─────────────────────────────────────────────────

#[test]
fn same_input_same_bytes() {
    let (_dir, letterhead) = letterhead_dir();
    let config = config_for(&letterhead);
    let html = "<h2>Minutes</h2><ul><li>a</li></ul><table><tr><td>x</td></tr></table>";
    let a = convert_blocking(html, "T", &config, &MockResolver::default()).expect("a");
    let b = convert_blocking(html, "T", &config, &MockResolver::default()).expect("b");
    assert_eq!(a.docx, b.docx);
}

#[test]
fn empty_input_yields_title_only() {
    let (_dir, letterhead) = letterhead_dir();
    let output = convert_blocking("", "Blank", &config_for(&letterhead), &MockResolver::default())
        .expect("convert");
    assert_eq!(output.stats.total_blocks, 1);
    assert!(part_str(&output.docx, "word/document.xml").contains("Blank"));
}

#[test]
fn core_properties_record_title_and_creator() {
    let (_dir, letterhead) = letterhead_dir();
    let config = ConversionConfig::builder()
        .letterhead_path(&letterhead)
        .creator("Secretariat")
        .build()
        .expect("config");
    let output =
        convert_blocking("<p>x</p>", "Q&A", &config, &MockResolver::default()).expect("convert");
    let core = part_str(&output.docx, "docProps/core.xml");
    assert!(core.contains("<dc:title>Q&amp;A</dc:title>"));
    assert!(core.contains("<dc:creator>Secretariat</dc:creator>"));
}

// ── File output and blocking entry point ─────────────────────────────────────

#[tokio::test]
async fn convert_to_file_writes_nested_path() {
    let (dir, letterhead) = letterhead_dir();
    let out = dir.path().join("out").join("nested").join("memo.docx");

    let stats = convert_to_file("<p>x</p>", "Memo", &out, &config_for(&letterhead))
        .await
        .expect("convert to file");

    let bytes = std::fs::read(&out).expect("output written");
    assert_eq!(stats.total_blocks, 2);
    assert_eq!(stats.output_bytes, bytes.len());
    assert!(part_str(&bytes, "word/document.xml").contains("Memo"));
    assert!(!out.with_extension("docx.tmp").exists());
}

#[test]
fn convert_sync_without_runtime() {
    let (_dir, letterhead) = letterhead_dir();
    let output = convert_sync("<h2>Notes</h2>", "Memo", &config_for(&letterhead))
        .expect("convert");
    assert_eq!(output.stats.total_blocks, 2);
    assert!(part_str(&output.docx, "word/document.xml").contains("Notes"));
}

#[tokio::test]
async fn extract_blocks_excludes_title() {
    let blocks = extract_blocks(
        "<h1>Agenda</h1><p>Discuss <b>budget</b> items</p>",
        &MockResolver::default(),
    )
    .await;
    assert_eq!(
        blocks,
        vec![
            DocumentBlock::Heading {
                level: 1,
                text: "Agenda".into()
            },
            DocumentBlock::Paragraph {
                runs: vec![
                    StyledRun::plain("Discuss "),
                    StyledRun::bold("budget"),
                    StyledRun::plain(" items"),
                ]
            },
        ]
    );
}

// ── Progress events ──────────────────────────────────────────────────────────

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl ConversionProgressCallback for Recorder {
    fn on_conversion_start(&self, top_level_nodes: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("start {top_level_nodes}"));
    }

    fn on_image_resolved(&self, source: &str, bytes: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("ok {source} {bytes}"));
    }

    fn on_image_failed(&self, source: &str, _error: &ImageError) {
        self.events.lock().unwrap().push(format!("fail {source}"));
    }

    fn on_conversion_complete(&self, total_blocks: usize, images_failed: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("done {total_blocks} {images_failed}"));
    }
}

#[test]
fn progress_events_are_reported() {
    let (_dir, letterhead) = letterhead_dir();
    let recorder = Arc::new(Recorder::default());
    let config = ConversionConfig::builder()
        .letterhead_path(&letterhead)
        .progress_callback(recorder.clone() as Arc<dyn ConversionProgressCallback>)
        .build()
        .expect("config");
    let resolver = MockResolver::default().with("https://img.example/a.png", b"abc", ImageType::Png);

    convert_blocking(
        r#"<img src="https://img.example/a.png"><img src="https://img.example/b.png">"#,
        "Events",
        &config,
        &resolver,
    )
    .expect("convert");

    assert_eq!(
        *recorder.events.lock().unwrap(),
        vec![
            "start 2".to_string(),
            "ok https://img.example/a.png 3".to_string(),
            "fail https://img.example/b.png".to_string(),
            "done 2 1".to_string(),
        ]
    );
}
