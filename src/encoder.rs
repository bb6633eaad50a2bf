//! Image to data URI conversion.

use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::error::{FridgeLensError, Result};

const FALLBACK_MIME: &str = "application/octet-stream";

/// An image inlined as a `data:<mime>;base64,<payload>` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedImage {
    uri: String,
    mime_type: String,
}

impl EncodedImage {
    /// Encode raw bytes with an explicit MIME type.
    ///
    /// An empty MIME type falls back to `application/octet-stream`. No size or
    /// format checks are made; the remote API is the judge of that.
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        let mut mime_type = mime_type.into();
        if mime_type.trim().is_empty() {
            mime_type = FALLBACK_MIME.to_string();
        }
        let uri = format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes));
        Self { uri, mime_type }
    }

    /// Read a file and encode its full contents, detecting the MIME type from
    /// the bytes first and the extension second.
    #[instrument(name = "encode_image_file", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let mime_type = guess_mime(&bytes, path);
        debug!(bytes = bytes.len(), mime_type = %mime_type, "Read image file");
        Ok(Self::from_bytes(&bytes, mime_type))
    }

    /// Accept an already-built base64 data URI.
    pub fn parse(uri: impl Into<String>) -> Result<Self> {
        let uri = uri.into();
        let (mime_type, _) = split_data_uri(&uri)?;
        let mime_type = mime_type.to_string();
        Ok(Self { uri, mime_type })
    }

    pub fn as_str(&self) -> &str {
        &self.uri
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn into_string(self) -> String {
        self.uri
    }

    /// Decode the payload back to the original bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        let (_, payload) = split_data_uri(&self.uri)?;
        STANDARD
            .decode(payload)
            .map_err(|e| FridgeLensError::EncodingError(format!("invalid base64 payload: {}", e)))
    }
}

impl std::fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.uri)
    }
}

/// Read an image file and return it as a data URI.
///
/// Read failures (missing file, permissions) are returned as
/// [`FridgeLensError::Io`] without retry.
///
/// ```no_run
/// # async fn example() -> fridgelens::Result<()> {
/// let image = fridgelens::image_to_data_uri("fridge.jpg").await?;
/// assert!(image.as_str().starts_with("data:image/jpeg;base64,"));
/// # Ok(())
/// # }
/// ```
pub async fn image_to_data_uri(path: impl AsRef<Path>) -> Result<EncodedImage> {
    EncodedImage::from_path(path).await
}

fn guess_mime(bytes: &[u8], path: &Path) -> String {
    if let Some(kind) = infer::get(bytes) {
        trace!(mime_type = kind.mime_type(), "MIME type detected from content");
        return kind.mime_type().to_string();
    }
    if let Some(mime) = mime_guess::from_path(path).first_raw() {
        trace!(mime_type = mime, "MIME type guessed from extension");
        return mime.to_string();
    }
    FALLBACK_MIME.to_string()
}

fn split_data_uri(uri: &str) -> Result<(&str, &str)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| FridgeLensError::EncodingError("missing `data:` prefix".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| FridgeLensError::EncodingError("missing `,` separator".to_string()))?;
    let mime_type = header.strip_suffix(";base64").ok_or_else(|| {
        FridgeLensError::EncodingError("only base64 data URIs are supported".to_string())
    })?;
    if mime_type.is_empty() {
        return Err(FridgeLensError::EncodingError(
            "data URI has no media type".to_string(),
        ));
    }
    Ok((mime_type, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_builds_data_uri() {
        let image = EncodedImage::from_bytes(b"abc", "image/png");
        assert_eq!(image.as_str(), "data:image/png;base64,YWJj");
        assert_eq!(image.mime_type(), "image/png");
    }

    #[test]
    fn test_empty_mime_falls_back() {
        let image = EncodedImage::from_bytes(b"abc", "");
        assert_eq!(image.as_str(), "data:application/octet-stream;base64,YWJj");
    }

    #[test]
    fn test_parse_rejects_non_data_uri() {
        assert!(matches!(
            EncodedImage::parse("https://example.com/fridge.jpg"),
            Err(FridgeLensError::EncodingError(_))
        ));
        assert!(EncodedImage::parse("data:image/png,plain").is_err());
        assert!(EncodedImage::parse("data:;base64,YWJj").is_err());
    }

    #[test]
    fn test_parse_and_decode() {
        let image = EncodedImage::parse("data:image/jpeg;base64,YWJj").expect("valid data uri");
        assert_eq!(image.mime_type(), "image/jpeg");
        assert_eq!(image.decode().expect("payload decodes"), b"abc");
    }

    #[test]
    fn test_guess_mime_prefers_content() {
        let png_magic = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert_eq!(guess_mime(&png_magic, Path::new("photo.jpg")), "image/png");
        assert_eq!(guess_mime(b"not an image", Path::new("photo.jpg")), "image/jpeg");
        assert_eq!(
            guess_mime(b"not an image", Path::new("photo")),
            "application/octet-stream"
        );
    }
}
