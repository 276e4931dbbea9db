//! # edgequake-html2docx
//!
//! Convert rich-text HTML fragments into letterheaded Word (`.docx`)
//! documents.
//!
//! ## Why this crate?
//!
//! Content edited in a browser rich-text editor has to end up as an office
//! document carrying the organisation's letterhead. This crate reads the
//! editor's HTML, maps it onto a small set of document blocks (headings,
//! paragraphs, list items, tables, images) and packages them as
//! WordprocessingML with the letterhead as the running header of every page.
//!
//! ## Pipeline Overview
//!
//! ```text
//! HTML fragment
//!  │
//!  ├─ 1. Parse     html5ever tree builder → SourceNode tree
//!  ├─ 2. Header    load + validate the letterhead (fatal on failure)
//!  ├─ 3. Walk      depth-first, order-preserving; images resolved on the way
//!  ├─ 4. Map       node → heading / paragraph / list item / table / image
//!  └─ 5. Package   title heading + blocks → deterministic .docx bytes
//! ```
//!
//! An image that cannot be resolved is dropped on its own; the rest of the
//! document is still produced. Only letterhead and packaging failures abort.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_html2docx::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert(
//!         "<h1>Agenda</h1><p>Discuss <b>budget</b> items</p>",
//!         "Weekly Meeting",
//!         &config,
//!     )
//!     .await?;
//!     std::fs::write("weekly-meeting.docx", &output.docx)?;
//!     eprintln!("{} blocks, {} images dropped",
//!         output.stats.total_blocks,
//!         output.stats.images_failed);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `html2docx` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-html2docx = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, DEFAULT_LETTERHEAD_PATH};
pub use convert::{
    assemble, convert, convert_nodes, convert_sync, convert_to_file, convert_with_resolver,
    extract_blocks, read_html,
};
pub use error::{Html2DocxError, ImageError};
pub use model::{
    ConversionOutput, ConversionStats, DocumentBlock, ImageType, ResolvedImage, StyledRun,
    TableCell,
};
pub use pipeline::image::{HttpImageResolver, ImageResolver};
pub use pipeline::parse::{parse_fragment, SourceNode};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
