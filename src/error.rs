//! Error types for the edgequake-html2docx library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Html2DocxError`] is **fatal**: the document cannot be produced at all
//!   (letterhead missing, packaging failed, output not writable). Returned as
//!   `Err(Html2DocxError)` from the top-level `convert*` functions.
//!
//! * [`ImageError`] is **non-fatal**: a single embedded image could not be
//!   resolved. The node that referenced it contributes no block and the
//!   conversion carries on with its siblings.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-html2docx library.
///
/// Per-image failures use [`ImageError`] and never surface here.
#[derive(Debug, Error)]
pub enum Html2DocxError {
    // ── Letterhead errors ─────────────────────────────────────────────────
    /// The bundled letterhead image could not be read.
    #[error("Letterhead image '{path}' could not be read: {source}\nEvery document requires the letterhead; check the asset is installed.")]
    LetterheadUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The letterhead file was read but is not a recognisable image.
    #[error("Letterhead image '{path}' is not a valid image: {detail}")]
    LetterheadInvalid { path: PathBuf, detail: String },

    // ── Assembly errors ───────────────────────────────────────────────────
    /// Writing the WordprocessingML package failed.
    #[error("Failed to serialise document: {0}")]
    Serialization(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not read the HTML input file.
    #[error("Failed to read input '{path}': {source}")]
    InputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output document.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The HTTP client used for remote images could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single image reference.
///
/// Absorbed by the block mapper: the image node yields no block, and the
/// error is only reported through logs and progress callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum ImageError {
    /// Source is neither a data URI nor an absolute HTTP/HTTPS URL.
    #[error("Unsupported image source '{source_ref}'")]
    UnsupportedSource { source_ref: String },

    /// Data URI is malformed or not base64-encoded.
    #[error("Malformed data URI: {detail}")]
    InvalidDataUri { detail: String },

    /// Base64 payload could not be decoded.
    #[error("Base64 decode failed: {detail}")]
    Base64Decode { detail: String },

    /// Network request or body read failed.
    #[error("Failed to download '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Server answered with a non-2xx status.
    #[error("Download of '{url}' returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// Fetch exceeded the configured per-image timeout.
    #[error("Download of '{url}' timed out after {secs}s")]
    Timeout { url: String, secs: u64 },
}
