//! Document model shared by every pipeline stage.
//!
//! The block list is the contract between the tree walker and the document
//! assembler: walking produces it, serialisation consumes it, and nothing in
//! between mutates it. All types are plain owned values so a block list can
//! be inspected, compared in tests, or dumped as JSON.

use serde::{Deserialize, Serialize};

/// Width and height, in pixels, of an image that declares neither.
pub const DEFAULT_IMAGE_WIDTH: u32 = 300;
pub const DEFAULT_IMAGE_HEIGHT: u32 = 200;

/// Fixed box the letterhead is drawn into, in pixels.
pub const LETTERHEAD_WIDTH: u32 = 500;
pub const LETTERHEAD_HEIGHT: u32 = 75;

/// Share of the table width given to every cell, in percent.
///
/// Applied regardless of the actual column count.
pub const TABLE_CELL_WIDTH_PCT: u32 = 25;

/// Raster formats the document can embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    #[default]
    Png,
    Jpg,
    Gif,
    Bmp,
}

impl ImageType {
    /// File extension used for the embedded media part.
    pub fn extension(self) -> &'static str {
        match self {
            ImageType::Png => "png",
            ImageType::Jpg => "jpg",
            ImageType::Gif => "gif",
            ImageType::Bmp => "bmp",
        }
    }

    /// MIME type registered in `[Content_Types].xml`.
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageType::Png => "image/png",
            ImageType::Jpg => "image/jpeg",
            ImageType::Gif => "image/gif",
            ImageType::Bmp => "image/bmp",
        }
    }

    pub const ALL: [ImageType; 4] = [ImageType::Png, ImageType::Jpg, ImageType::Gif, ImageType::Bmp];
}

/// Raw image bytes plus the type inferred from the source reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedImage {
    #[serde(skip)]
    pub data: Vec<u8>,
    pub image_type: ImageType,
}

impl ResolvedImage {
    pub fn new(data: Vec<u8>, image_type: ImageType) -> Self {
        Self { data, image_type }
    }
}

/// A run of text sharing one set of inline styles.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StyledRun {
    pub text: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl StyledRun {
    /// An unstyled run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            bold: true,
            ..Self::plain(text)
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            italic: true,
            ..Self::plain(text)
        }
    }

    pub fn underline(text: impl Into<String>) -> Self {
        Self {
            underline: true,
            ..Self::plain(text)
        }
    }
}

/// One table cell: a sequence of paragraphs, each a sequence of runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCell {
    pub paragraphs: Vec<Vec<StyledRun>>,
    /// Width as a percentage of the table width.
    pub width_pct: u32,
}

/// A structural unit of the output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentBlock {
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        runs: Vec<StyledRun>,
    },
    ListItem {
        text: String,
        bullet: bool,
        /// 1-based position among the list's items.
        ordinal: usize,
    },
    Image {
        image: ResolvedImage,
        width: u32,
        height: u32,
        centered: bool,
    },
    Table {
        rows: Vec<Vec<TableCell>>,
    },
    LineBreak,
}

impl DocumentBlock {
    /// Visible text of the block in reading order, runs concatenated.
    ///
    /// Images and line breaks have no text.
    pub fn text(&self) -> String {
        fn runs_text(runs: &[StyledRun]) -> String {
            runs.iter().map(|r| r.text.as_str()).collect()
        }
        match self {
            DocumentBlock::Heading { text, .. } | DocumentBlock::ListItem { text, .. } => {
                text.clone()
            }
            DocumentBlock::Paragraph { runs } => runs_text(runs),
            DocumentBlock::Table { rows } => rows
                .iter()
                .flat_map(|row| row.iter())
                .flat_map(|cell| cell.paragraphs.iter())
                .map(|p| runs_text(p))
                .collect(),
            DocumentBlock::Image { .. } | DocumentBlock::LineBreak => String::new(),
        }
    }
}

/// The result of a successful conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutput {
    /// The finished `.docx` package.
    #[serde(skip_serializing)]
    pub docx: Vec<u8>,
    pub stats: ConversionStats,
}

/// Counters describing one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Blocks in the document body, title included.
    pub total_blocks: usize,
    pub images_embedded: usize,
    /// Image nodes dropped because their source could not be resolved.
    pub images_failed: usize,
    pub output_bytes: usize,
    pub duration_ms: u64,
}
