//! Configuration types for HTML-to-DOCX conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Layout constants (default image size,
//! letterhead box, table cell width) are not part of the config;
//! they live in [`crate::model`] and are the same for every document.

use crate::error::Html2DocxError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Location of the bundled letterhead image, relative to the working directory.
pub const DEFAULT_LETTERHEAD_PATH: &str = "assets/letterhead.png";

/// Configuration for an HTML-to-DOCX conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_html2docx::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .letterhead_path("/srv/portal/assets/letterhead.png")
///     .image_timeout_secs(10)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Path of the letterhead image placed in the running header. Default: `assets/letterhead.png`.
    ///
    /// Read once per conversion. A missing or unreadable file aborts the
    /// conversion: documents without the letterhead are never produced.
    pub letterhead_path: PathBuf,

    /// Per-image download timeout in seconds. Default: 30.
    ///
    /// A timed-out image is dropped like any other failed image; the rest of
    /// the document is unaffected.
    pub image_timeout_secs: u64,

    /// Author recorded in the document's core properties.
    pub creator: Option<String>,

    /// Optional per-image progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            letterhead_path: PathBuf::from(DEFAULT_LETTERHEAD_PATH),
            image_timeout_secs: 30,
            creator: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("letterhead_path", &self.letterhead_path)
            .field("image_timeout_secs", &self.image_timeout_secs)
            .field("creator", &self.creator)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn letterhead_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.letterhead_path = path.into();
        self
    }

    pub fn image_timeout_secs(mut self, secs: u64) -> Self {
        self.config.image_timeout_secs = secs;
        self
    }

    pub fn creator(mut self, creator: impl Into<String>) -> Self {
        self.config.creator = Some(creator.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Html2DocxError> {
        let c = &self.config;
        if c.image_timeout_secs == 0 {
            return Err(Html2DocxError::InvalidConfig(
                "Image timeout must be ≥ 1 second".into(),
            ));
        }
        if c.letterhead_path.as_os_str().is_empty() {
            return Err(Html2DocxError::InvalidConfig(
                "Letterhead path must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ConversionConfig::default();
        assert_eq!(c.letterhead_path, PathBuf::from(DEFAULT_LETTERHEAD_PATH));
        assert_eq!(c.image_timeout_secs, 30);
        assert!(c.creator.is_none());
        assert!(c.progress_callback.is_none());
    }

    #[test]
    fn builder_sets_fields() {
        let c = ConversionConfig::builder()
            .letterhead_path("/tmp/lh.jpg")
            .image_timeout_secs(5)
            .creator("Board Secretary")
            .build()
            .expect("valid config");
        assert_eq!(c.letterhead_path, PathBuf::from("/tmp/lh.jpg"));
        assert_eq!(c.image_timeout_secs, 5);
        assert_eq!(c.creator.as_deref(), Some("Board Secretary"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = ConversionConfig::builder()
            .image_timeout_secs(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, Html2DocxError::InvalidConfig(_)));
    }

    #[test]
    fn empty_letterhead_rejected() {
        let err = ConversionConfig::builder()
            .letterhead_path("")
            .build()
            .unwrap_err();
        assert!(matches!(err, Html2DocxError::InvalidConfig(_)));
    }

    #[test]
    fn debug_hides_callback() {
        let c = ConversionConfig::builder()
            .progress_callback(std::sync::Arc::new(crate::progress::NoopProgressCallback))
            .build()
            .expect("valid config");
        let s = format!("{c:?}");
        assert!(s.contains("<dyn ConversionProgressCallback>"), "got: {s}");
    }
}
