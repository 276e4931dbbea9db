//! Image resolution: image reference → raw bytes + inferred type.
//!
//! Two kinds of reference appear in editor output:
//!
//! * `data:image/...;base64,...` URIs, decoded in-process with no I/O;
//! * absolute `http(s)://` URLs, fetched once with a per-request timeout.
//!
//! Every failure is returned as an [`ImageError`] value, never propagated as
//! a fatal error: the caller drops the image node and carries on.
//!
//! ## Type inference
//!
//! The image type comes from the reference's file extension, not from the
//! bytes. Unknown or missing extensions fall back to PNG, so a resolved image
//! always has a type even when the guess is wrong.

use crate::error::{Html2DocxError, ImageError};
use crate::model::{ImageType, ResolvedImage};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Resolves an image reference to bytes.
///
/// The seam between the pure tree walk and the network. Tests substitute an
/// in-memory implementation; production uses [`HttpImageResolver`].
pub trait ImageResolver: Send + Sync {
    fn resolve(
        &self,
        source: &str,
    ) -> impl Future<Output = Result<ResolvedImage, ImageError>> + Send;
}

/// Resolver backed by `reqwest`, with in-process data-URI decoding.
#[derive(Debug, Clone)]
pub struct HttpImageResolver {
    client: reqwest::Client,
    timeout_secs: u64,
}

impl HttpImageResolver {
    /// Build a resolver whose fetches give up after `timeout_secs`.
    pub fn new(timeout_secs: u64) -> Result<Self, Html2DocxError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Html2DocxError::HttpClient(e.to_string()))?;
        Ok(Self {
            client,
            timeout_secs,
        })
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        debug!("Fetching image: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ImageError::Timeout {
                    url: url.to_string(),
                    secs: self.timeout_secs,
                }
            } else {
                ImageError::DownloadFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        if !response.status().is_success() {
            return Err(ImageError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                ImageError::Timeout {
                    url: url.to_string(),
                    secs: self.timeout_secs,
                }
            } else {
                ImageError::DownloadFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        debug!("Fetched {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}

impl ImageResolver for HttpImageResolver {
    async fn resolve(&self, source: &str) -> Result<ResolvedImage, ImageError> {
        let data = if is_data_uri(source) {
            decode_data_uri(source)?
        } else if is_url(source) {
            self.fetch(source).await?
        } else {
            return Err(ImageError::UnsupportedSource {
                source_ref: source.to_string(),
            });
        };
        Ok(ResolvedImage::new(data, infer_image_type(source)))
    }
}

/// Check if the source looks like a remote URL.
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

pub fn is_data_uri(source: &str) -> bool {
    source
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

static RE_DATA_URI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^data:([^,;]*)((?:;[^,;]*)*),(.*)$").unwrap());

/// Decode the payload of a `data:<mime>;base64,<payload>` URI.
///
/// Whitespace inside the payload (line-wrapped base64) is ignored.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, ImageError> {
    let caps = RE_DATA_URI
        .captures(uri)
        .ok_or_else(|| ImageError::InvalidDataUri {
            detail: "expected data:<mime>[;base64],<payload>".into(),
        })?;

    let is_base64 = caps[2]
        .split(';')
        .any(|p| p.trim().eq_ignore_ascii_case("base64"));
    if !is_base64 {
        return Err(ImageError::InvalidDataUri {
            detail: "payload is not base64-encoded".into(),
        });
    }

    let payload: String = caps[3].chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(payload.as_bytes())
        .map_err(|e| ImageError::Base64Decode {
            detail: e.to_string(),
        })
}

/// Infer the image type from the reference's file extension.
///
/// Query strings and fragments are ignored. `.jpg`/`.jpeg` → Jpg, `.gif` →
/// Gif, `.bmp` → Bmp; everything else, data URIs included, → Png.
pub fn infer_image_type(source: &str) -> ImageType {
    if is_data_uri(source) {
        return ImageType::Png;
    }
    let path = source.split(['?', '#']).next().unwrap_or(source);
    let last_segment = path.rsplit('/').next().unwrap_or(path);
    let ext = match last_segment.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return ImageType::Png,
    };
    match ext.as_str() {
        "jpg" | "jpeg" => ImageType::Jpg,
        "gif" => ImageType::Gif,
        "bmp" => ImageType::Bmp,
        _ => ImageType::Png,
    }
}

/// Read and validate the letterhead image from the local filesystem.
///
/// Unlike content images, any failure here is fatal.
pub async fn load_letterhead(path: &Path) -> Result<ResolvedImage, Html2DocxError> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| Html2DocxError::LetterheadUnavailable {
            path: path.to_path_buf(),
            source: e,
        })?;

    image::guess_format(&data).map_err(|e| Html2DocxError::LetterheadInvalid {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let image_type = infer_image_type(&path.to_string_lossy());
    info!(
        "Loaded letterhead {} ({} bytes, {:?})",
        path.display(),
        data.len(),
        image_type
    );
    Ok(ResolvedImage::new(data, image_type))
}
