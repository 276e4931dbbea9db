//! Block mapping: one source node → zero or more document blocks.
//!
//! | node | blocks |
//! |------|--------|
//! | `h1`–`h3` | one heading, text = full text content |
//! | `p` | one paragraph of inline runs |
//! | `ul` / `ol` | one list item per `li`; only `ul` items are bulleted |
//! | `table` | one table; every cell fixed at a quarter of the table width |
//! | `img` | one centred image, or nothing if the source cannot be resolved |
//! | `br` | one line break |
//! | bare text / stray `b`,`i`,`u` | one single-run paragraph |
//! | anything else | nothing itself; children mapped and spliced in place |
//!
//! Ordered lists are emitted as plain paragraphs (no numbering), and table
//! cells ignore the real column count. Both are kept as-is for output
//! compatibility with documents already on file.

use crate::model::{
    DocumentBlock, StyledRun, TableCell, DEFAULT_IMAGE_HEIGHT, DEFAULT_IMAGE_WIDTH,
    TABLE_CELL_WIDTH_PCT,
};
use crate::pipeline::image::{is_data_uri, ImageResolver};
use crate::pipeline::inline::{inline_run, resolve_inline};
use crate::pipeline::parse::{Element, ImageAttrs, ListKind, NodeKind, SourceNode};
use crate::pipeline::walk::{walk_concurrent, WalkContext};
use futures::future::{BoxFuture, FutureExt};
use std::borrow::Cow;
use tracing::{debug, warn};

/// Map a single node to its blocks.
///
/// Heading and list-item text is the node's full text content with leading
/// and trailing whitespace trimmed; paragraph runs keep their spacing.
///
/// Boxed because pass-through containers recurse back into the walker.
pub fn map_block<'a, R: ImageResolver>(
    node: &'a SourceNode,
    ctx: &'a WalkContext<'a, R>,
) -> BoxFuture<'a, Vec<DocumentBlock>> {
    async move {
        let el = match node {
            SourceNode::Text(text) => return text_block(text).into_iter().collect(),
            SourceNode::Element(el) => el,
        };

        match &el.kind {
            NodeKind::Heading(level) => vec![DocumentBlock::Heading {
                level: *level,
                text: node.text_content().trim().to_string(),
            }],
            NodeKind::Paragraph => vec![DocumentBlock::Paragraph {
                runs: resolve_inline(node),
            }],
            NodeKind::List(kind) => list_items(el, *kind),
            NodeKind::Table => vec![table(el)],
            NodeKind::Image(attrs) => image_block(attrs, ctx).await.into_iter().collect(),
            NodeKind::LineBreak => vec![DocumentBlock::LineBreak],
            NodeKind::Bold | NodeKind::Italic | NodeKind::Underline => inline_run(node)
                .map(|run| DocumentBlock::Paragraph { runs: vec![run] })
                .into_iter()
                .collect(),
            NodeKind::ListItem | NodeKind::TableRow | NodeKind::TableCell | NodeKind::Other(_) => {
                walk_concurrent(&el.children, ctx).await
            }
        }
    }
    .boxed()
}

/// Text sitting directly in a container becomes its own paragraph.
fn text_block(text: &str) -> Option<DocumentBlock> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(DocumentBlock::Paragraph {
        runs: vec![StyledRun::plain(trimmed)],
    })
}

fn list_items(list: &Element, kind: ListKind) -> Vec<DocumentBlock> {
    list.children
        .iter()
        .filter(|c| matches!(c.kind(), Some(NodeKind::ListItem)))
        .enumerate()
        .map(|(i, li)| DocumentBlock::ListItem {
            text: li.text_content().trim().to_string(),
            bullet: kind == ListKind::Unordered,
            ordinal: i + 1,
        })
        .collect()
}

fn table(table: &Element) -> DocumentBlock {
    let rows = table_rows(table)
        .into_iter()
        .map(|tr| {
            tr.children()
                .iter()
                .filter(|c| matches!(c.kind(), Some(NodeKind::TableCell)))
                .map(|cell| TableCell {
                    paragraphs: vec![resolve_inline(cell)],
                    width_pct: TABLE_CELL_WIDTH_PCT,
                })
                .collect::<Vec<_>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect();
    DocumentBlock::Table { rows }
}

/// Rows directly under the table or under its `thead`/`tbody`/`tfoot`
/// sections (the parser inserts an implicit `tbody`).
fn table_rows(table: &Element) -> Vec<&SourceNode> {
    let mut rows = Vec::new();
    for child in &table.children {
        match child.kind() {
            Some(NodeKind::TableRow) => rows.push(child),
            Some(NodeKind::Other(tag)) if matches!(tag.as_str(), "thead" | "tbody" | "tfoot") => {
                rows.extend(
                    child
                        .children()
                        .iter()
                        .filter(|c| matches!(c.kind(), Some(NodeKind::TableRow))),
                );
            }
            _ => {}
        }
    }
    rows
}

async fn image_block<R: ImageResolver>(
    attrs: &ImageAttrs,
    ctx: &WalkContext<'_, R>,
) -> Option<DocumentBlock> {
    let Some(src) = attrs.src.as_deref() else {
        debug!("Skipping <img> without src");
        return None;
    };

    ctx.image_started(src);
    match ctx.resolver().resolve(src).await {
        Ok(image) => {
            debug!(
                "Resolved image {} → {} bytes ({:?})",
                short_source(src),
                image.data.len(),
                image.image_type
            );
            ctx.image_resolved(src, image.data.len());
            Some(DocumentBlock::Image {
                image,
                width: attrs.width.unwrap_or(DEFAULT_IMAGE_WIDTH),
                height: attrs.height.unwrap_or(DEFAULT_IMAGE_HEIGHT),
                centered: true,
            })
        }
        Err(e) => {
            warn!("Dropping image {}: {}", short_source(src), e);
            ctx.image_failed(src, &e);
            None
        }
    }
}

/// Data URIs can be megabytes long; log only their header.
fn short_source(src: &str) -> Cow<'_, str> {
    match src.split_once(',') {
        Some((header, payload)) if is_data_uri(header) => {
            Cow::Owned(format!("{header},… ({} chars)", payload.len()))
        }
        _ => Cow::Borrowed(src),
    }
}
