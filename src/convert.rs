//! Conversion entry points.
//!
//! Every path funnels into [`convert_nodes`]:
//!
//! ```text
//! convert ─────────────▶ convert_with_resolver ──▶ convert_nodes
//! (HttpImageResolver)    (parse_fragment)          │
//!                                                  ├─ load letterhead (fatal on failure)
//!                                                  ├─ walk → blocks (image failures absorbed)
//!                                                  └─ assemble → .docx bytes
//! ```
//!
//! The letterhead is loaded before the walk so a missing asset fails fast,
//! without any image having been fetched.

use crate::config::ConversionConfig;
use crate::error::Html2DocxError;
use crate::model::{ConversionOutput, ConversionStats, DocumentBlock, ResolvedImage};
use crate::pipeline::docx::{write_docx, CoreProperties};
use crate::pipeline::image::{load_letterhead, HttpImageResolver, ImageResolver};
use crate::pipeline::parse::{parse_fragment, SourceNode};
use crate::pipeline::walk::{walk, WalkContext};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Convert an HTML fragment into a letterheaded `.docx` document.
///
/// Remote images are fetched over HTTP with the configured timeout.
///
/// # Errors
/// Returns `Err(Html2DocxError)` only for fatal errors:
/// - the letterhead cannot be read or is not an image
/// - the package cannot be serialised
/// - the HTTP client cannot be built
///
/// Unresolvable images are not errors; see `output.stats.images_failed`.
pub async fn convert(
    html: &str,
    title: &str,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Html2DocxError> {
    let resolver = HttpImageResolver::new(config.image_timeout_secs)?;
    convert_with_resolver(html, title, config, &resolver).await
}

/// Like [`convert`], with a caller-supplied image resolver.
pub async fn convert_with_resolver<R: ImageResolver>(
    html: &str,
    title: &str,
    config: &ConversionConfig,
    resolver: &R,
) -> Result<ConversionOutput, Html2DocxError> {
    let root = parse_fragment(html);
    convert_nodes(root.children(), title, config, resolver).await
}

/// Convert an already-parsed sequence of top-level nodes.
pub async fn convert_nodes<R: ImageResolver>(
    nodes: &[SourceNode],
    title: &str,
    config: &ConversionConfig,
    resolver: &R,
) -> Result<ConversionOutput, Html2DocxError> {
    let start = Instant::now();
    info!(
        "Starting conversion: \"{}\" ({} top-level nodes)",
        title,
        nodes.len()
    );

    let letterhead = load_letterhead(&config.letterhead_path).await?;

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(nodes.len());
    }

    let ctx = WalkContext::new(resolver, config.progress_callback.clone());
    let blocks = walk(nodes, &ctx).await;
    debug!("Walk produced {} blocks", blocks.len());

    let docx = assemble(title, &blocks, &letterhead, config.creator.as_deref())?;

    let stats = ConversionStats {
        total_blocks: blocks.len() + 1,
        images_embedded: ctx.images_embedded(),
        images_failed: ctx.images_failed(),
        output_bytes: docx.len(),
        duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {} blocks, {} images ({} failed), {} bytes in {}ms",
        stats.total_blocks,
        stats.images_embedded,
        stats.images_failed,
        stats.output_bytes,
        stats.duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(stats.total_blocks, stats.images_failed);
    }

    Ok(ConversionOutput { docx, stats })
}

/// Parse and walk `html` without producing a document.
///
/// The returned list excludes the title heading that [`assemble`] adds.
pub async fn extract_blocks<R: ImageResolver>(html: &str, resolver: &R) -> Vec<DocumentBlock> {
    let root = parse_fragment(html);
    let ctx = WalkContext::new(resolver, None);
    walk(root.children(), &ctx).await
}

/// Build the `.docx` package: a level-1 `title` heading followed by
/// `blocks`, with `letterhead` as the running header of every page.
pub fn assemble(
    title: &str,
    blocks: &[DocumentBlock],
    letterhead: &ResolvedImage,
    creator: Option<&str>,
) -> Result<Vec<u8>, Html2DocxError> {
    let heading = DocumentBlock::Heading {
        level: 1,
        text: title.to_string(),
    };
    let props = CoreProperties { title, creator };
    write_docx(std::iter::once(&heading).chain(blocks), letterhead, &props)
}

/// Convert and write the document directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn convert_to_file(
    html: &str,
    title: &str,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, Html2DocxError> {
    let output = convert(html, title, config).await?;
    write_atomic(output_path.as_ref(), &output.docx).await?;
    Ok(output.stats)
}

pub(crate) async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), Html2DocxError> {
    let write_err = |e| Html2DocxError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = path.with_extension("docx.tmp");
    tokio::fs::write(&tmp_path, bytes).await.map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;
    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Read an HTML fragment from a local file.
pub async fn read_html(path: impl AsRef<Path>) -> Result<String, Html2DocxError> {
    let path = path.as_ref();
    let html = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Html2DocxError::InputReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    debug!("Read {} bytes of HTML from {}", html.len(), path.display());
    Ok(html)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    html: &str,
    title: &str,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Html2DocxError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Html2DocxError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(html, title, config))
}
