//! Progress-callback trait for per-image conversion events.
//!
//! Image resolution is the only step of a conversion that waits on the
//! network, so it is the only step that reports progress. Inject an
//! [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`].
//!
//! # Example
//!
//! ```rust
//! use edgequake_html2docx::{ConversionProgressCallback, ConversionConfig, ImageError};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct FailureCounter {
//!     failed: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for FailureCounter {
//!     fn on_image_failed(&self, source: &str, error: &ImageError) {
//!         self.failed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("dropped {source}: {error}");
//!     }
//! }
//!
//! let counter = Arc::new(FailureCounter { failed: AtomicUsize::new(0) });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::error::ImageError;
use std::sync::Arc;

/// Called by the conversion pipeline as it walks the fragment.
///
/// Implementations must be `Send + Sync`. Sibling images inside one
/// container are fetched concurrently, so `on_image_*` events may interleave.
/// All methods have default no-op implementations.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once after the fragment is parsed.
    ///
    /// # Arguments
    /// * `top_level_nodes`: number of top-level nodes that will be walked
    fn on_conversion_start(&self, top_level_nodes: usize) {
        let _ = top_level_nodes;
    }

    /// Called before an image source is resolved.
    fn on_image_start(&self, source: &str) {
        let _ = source;
    }

    /// Called when an image was resolved and will be embedded.
    ///
    /// # Arguments
    /// * `source`: the image reference as written in the markup
    /// * `bytes` : size of the resolved image payload
    fn on_image_resolved(&self, source: &str, bytes: usize) {
        let _ = (source, bytes);
    }

    /// Called when an image could not be resolved and was dropped.
    fn on_image_failed(&self, source: &str, error: &ImageError) {
        let _ = (source, error);
    }

    /// Called once after the document has been serialised.
    ///
    /// # Arguments
    /// * `total_blocks` : blocks in the document, title included
    /// * `images_failed`: image nodes dropped during the walk
    fn on_conversion_complete(&self, total_blocks: usize, images_failed: usize) {
        let _ = (total_blocks, images_failed);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
