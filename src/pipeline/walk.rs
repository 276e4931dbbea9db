//! Tree walking: node sequence → flat, ordered block list.
//!
//! Two strategies share one invariant: the returned blocks follow the
//! depth-first, left-to-right order of the source tree.
//!
//! * [`walk`] maps top-level nodes one at a time, awaiting each in turn.
//! * [`walk_concurrent`] maps all children of a pass-through container at
//!   once and re-joins the results positionally. Image fetches in sibling
//!   subtrees overlap, but `join_all` returns outputs in input order, so a
//!   slow fetch can delay the result without ever reordering it.
//!
//! Everything runs inside the caller's task; there is no spawning.

use crate::error::ImageError;
use crate::model::DocumentBlock;
use crate::pipeline::blocks::map_block;
use crate::pipeline::image::ImageResolver;
use crate::pipeline::parse::SourceNode;
use crate::progress::ProgressCallback;
use futures::future::join_all;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Per-conversion state threaded through the walk.
///
/// Holds the image resolver, the optional progress callback and image
/// counters. Created fresh for every conversion and dropped with it.
pub struct WalkContext<'a, R: ImageResolver> {
    resolver: &'a R,
    progress: Option<ProgressCallback>,
    images_embedded: AtomicUsize,
    images_failed: AtomicUsize,
}

impl<'a, R: ImageResolver> WalkContext<'a, R> {
    pub fn new(resolver: &'a R, progress: Option<ProgressCallback>) -> Self {
        Self {
            resolver,
            progress,
            images_embedded: AtomicUsize::new(0),
            images_failed: AtomicUsize::new(0),
        }
    }

    pub fn resolver(&self) -> &R {
        self.resolver
    }

    pub fn images_embedded(&self) -> usize {
        self.images_embedded.load(Ordering::Relaxed)
    }

    pub fn images_failed(&self) -> usize {
        self.images_failed.load(Ordering::Relaxed)
    }

    pub(crate) fn image_started(&self, source: &str) {
        if let Some(cb) = &self.progress {
            cb.on_image_start(source);
        }
    }

    pub(crate) fn image_resolved(&self, source: &str, bytes: usize) {
        self.images_embedded.fetch_add(1, Ordering::Relaxed);
        if let Some(cb) = &self.progress {
            cb.on_image_resolved(source, bytes);
        }
    }

    pub(crate) fn image_failed(&self, source: &str, error: &ImageError) {
        self.images_failed.fetch_add(1, Ordering::Relaxed);
        if let Some(cb) = &self.progress {
            cb.on_image_failed(source, error);
        }
    }
}

/// Map `nodes` in order, one node at a time, concatenating their blocks.
pub async fn walk<R: ImageResolver>(
    nodes: &[SourceNode],
    ctx: &WalkContext<'_, R>,
) -> Vec<DocumentBlock> {
    let mut blocks = Vec::new();
    for node in nodes {
        blocks.extend(map_block(node, ctx).await);
    }
    blocks
}

/// Map all `nodes` concurrently, then flatten their blocks in source order.
pub async fn walk_concurrent<R: ImageResolver>(
    nodes: &[SourceNode],
    ctx: &WalkContext<'_, R>,
) -> Vec<DocumentBlock> {
    join_all(nodes.iter().map(|node| map_block(node, ctx)))
        .await
        .into_iter()
        .flatten()
        .collect()
}
