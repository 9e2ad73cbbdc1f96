//! Image value types shared by the engine, the gallery and the CLI.
//!
//! Images travel as data URIs (`data:image/png;base64,...`), the same textual
//! form the gallery persists, so a transform result can be stored or handed
//! back to a caller without another encoding step.

use crate::core::error::TransformError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Supported image formats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    WebP,
    Tiff,
    Bmp,
    Unknown,
}

/// An image encoded inline as a base64 data URI.
#[derive(Clone, PartialEq, Eq)]
pub struct DataUri {
    mime: String,
    data: Vec<u8>,
}

// ============================================================================
// ImageFormat Implementation
// ============================================================================

impl ImageFormat {
    /// Determine image format from file path extension.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            "png" => ImageFormat::Png,
            "gif" => ImageFormat::Gif,
            "webp" => ImageFormat::WebP,
            "tiff" | "tif" => ImageFormat::Tiff,
            "bmp" => ImageFormat::Bmp,
            _ => ImageFormat::Unknown,
        }
    }

    /// Determine image format from a MIME type such as `image/png`.
    pub fn from_mime(mime: &str) -> Self {
        match mime.trim().to_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => ImageFormat::Jpeg,
            "image/png" => ImageFormat::Png,
            "image/gif" => ImageFormat::Gif,
            "image/webp" => ImageFormat::WebP,
            "image/tiff" => ImageFormat::Tiff,
            "image/bmp" | "image/x-ms-bmp" => ImageFormat::Bmp,
            _ => ImageFormat::Unknown,
        }
    }

    /// Convert from the image crate's format, if we know it.
    pub fn from_image_format(format: image::ImageFormat) -> Self {
        match format {
            image::ImageFormat::Jpeg => ImageFormat::Jpeg,
            image::ImageFormat::Png => ImageFormat::Png,
            image::ImageFormat::Gif => ImageFormat::Gif,
            image::ImageFormat::WebP => ImageFormat::WebP,
            image::ImageFormat::Tiff => ImageFormat::Tiff,
            image::ImageFormat::Bmp => ImageFormat::Bmp,
            _ => ImageFormat::Unknown,
        }
    }

    /// Convert to image crate's ImageFormat.
    pub fn to_image_format(&self) -> Option<image::ImageFormat> {
        match self {
            ImageFormat::Jpeg => Some(image::ImageFormat::Jpeg),
            ImageFormat::Png => Some(image::ImageFormat::Png),
            ImageFormat::Gif => Some(image::ImageFormat::Gif),
            ImageFormat::WebP => Some(image::ImageFormat::WebP),
            ImageFormat::Tiff => Some(image::ImageFormat::Tiff),
            ImageFormat::Bmp => Some(image::ImageFormat::Bmp),
            ImageFormat::Unknown => None,
        }
    }

    /// MIME type used when building a data URI.
    pub fn mime(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Tiff => "image/tiff",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Unknown => "application/octet-stream",
        }
    }

    /// Get the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::WebP => "webp",
            ImageFormat::Tiff => "tiff",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Unknown => "bin",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Jpeg => write!(f, "JPEG"),
            ImageFormat::Png => write!(f, "PNG"),
            ImageFormat::Gif => write!(f, "GIF"),
            ImageFormat::WebP => write!(f, "WebP"),
            ImageFormat::Tiff => write!(f, "TIFF"),
            ImageFormat::Bmp => write!(f, "BMP"),
            ImageFormat::Unknown => write!(f, "Unknown"),
        }
    }
}

// ============================================================================
// DataUri Implementation
// ============================================================================

impl DataUri {
    /// Wrap raw bytes with an explicit MIME type.
    pub fn new(mime: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            data,
        }
    }

    /// Wrap encoded image bytes, sniffing the MIME type from the content.
    pub fn from_image_bytes(data: Vec<u8>) -> Self {
        let format = image::guess_format(&data)
            .map(ImageFormat::from_image_format)
            .unwrap_or(ImageFormat::Unknown);
        Self::new(format.mime(), data)
    }

    /// Read an image file into a data URI.
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let sniffed = Self::from_image_bytes(data);
        if sniffed.format() == ImageFormat::Unknown {
            let by_ext = ImageFormat::from_path(path);
            return Ok(Self::new(by_ext.mime(), sniffed.data));
        }
        Ok(sniffed)
    }

    /// Parse a `data:<mime>;base64,<payload>` string.
    ///
    /// Only base64 payloads are accepted; an absent MIME type defaults to
    /// `text/plain` as in RFC 2397.
    pub fn parse(uri: &str) -> Result<Self, TransformError> {
        let rest = uri
            .trim()
            .strip_prefix("data:")
            .ok_or(TransformError::MalformedDataUri)?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or(TransformError::MalformedDataUri)?;

        let mut params = header.split(';');
        let mime = match params.next().map(str::trim) {
            Some(m) if !m.is_empty() => m.to_lowercase(),
            _ => "text/plain".to_string(),
        };
        if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            return Err(TransformError::InvalidPayload(
                "only base64 data URIs are supported".to_string(),
            ));
        }

        let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        let data = BASE64
            .decode(compact.as_bytes())
            .map_err(|e| TransformError::InvalidPayload(e.to_string()))?;

        Ok(Self { mime, data })
    }

    /// Encode a decoded image into a data URI of the given format.
    pub fn encode_image(image: &DynamicImage, format: ImageFormat) -> Result<Self, TransformError> {
        let target = format
            .to_image_format()
            .ok_or_else(|| TransformError::Encode(format!("cannot encode {}", format)))?;
        let mut buffer = std::io::Cursor::new(Vec::new());
        image
            .write_to(&mut buffer, target)
            .map_err(|e| TransformError::Encode(e.to_string()))?;
        Ok(Self::new(format.mime(), buffer.into_inner()))
    }

    /// The MIME type from the URI header.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// The decoded payload.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the payload.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Image format implied by the MIME type.
    pub fn format(&self) -> ImageFormat {
        ImageFormat::from_mime(&self.mime)
    }

    /// Whether the MIME type is in the `image/*` family.
    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    /// Decode the payload into pixels.
    ///
    /// Non-image MIME types are rejected before any decoding is attempted.
    pub fn decode_image(&self) -> Result<DynamicImage, TransformError> {
        if !self.is_image() {
            return Err(TransformError::NotAnImage {
                mime: self.mime.clone(),
            });
        }
        let decoded = match self.format().to_image_format() {
            Some(format) => image::load_from_memory_with_format(&self.data, format),
            None => image::load_from_memory(&self.data),
        };
        decoded.map_err(|e| TransformError::Decode(e.to_string()))
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime, BASE64.encode(&self.data))
    }
}

impl fmt::Debug for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataUri")
            .field("mime", &self.mime)
            .field("len", &self.data.len())
            .finish()
    }
}

impl std::str::FromStr for DataUri {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn tiny_png() -> DataUri {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255])));
        DataUri::encode_image(&img, ImageFormat::Png).unwrap()
    }

    #[test]
    fn test_parse_rejects_non_data_uri() {
        assert_eq!(
            DataUri::parse("https://example.com/cat.png"),
            Err(TransformError::MalformedDataUri)
        );
        assert_eq!(DataUri::parse("data:image/png;base64"), Err(TransformError::MalformedDataUri));
    }

    #[test]
    fn test_parse_requires_base64() {
        let err = DataUri::parse("data:image/png,rawbytes").unwrap_err();
        assert!(matches!(err, TransformError::InvalidPayload(_)));
    }

    #[test]
    fn test_parse_image_uri() {
        let uri = tiny_png().to_string();
        assert!(uri.starts_with("data:image/png;base64,"));

        let parsed: DataUri = uri.parse().unwrap();
        assert_eq!(parsed.format(), ImageFormat::Png);
        let img = parsed.decode_image().unwrap();
        assert_eq!((img.width(), img.height()), (3, 2));
    }

    #[test]
    fn test_missing_mime_is_text() {
        let parsed = DataUri::parse("data:;base64,aGVsbG8=").unwrap();
        assert_eq!(parsed.mime(), "text/plain");
        assert_eq!(parsed.bytes(), b"hello");
        assert!(matches!(
            parsed.decode_image(),
            Err(TransformError::NotAnImage { .. })
        ));
    }

    #[test]
    fn test_corrupt_image_fails_decode() {
        let uri = DataUri::new("image/png", vec![0, 1, 2, 3]);
        assert!(matches!(uri.decode_image(), Err(TransformError::Decode(_))));
    }

    #[test]
    fn test_sniff_format_from_bytes() {
        let bytes = tiny_png().into_bytes();
        let sniffed = DataUri::from_image_bytes(bytes);
        assert_eq!(sniffed.mime(), "image/png");
    }

    #[test]
    fn test_format_lookup() {
        assert_eq!(ImageFormat::from_mime("IMAGE/JPEG"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_path(Path::new("a/b.TIF")), ImageFormat::Tiff);
        assert_eq!(ImageFormat::Jpeg.extension(), "jpg");
        assert_eq!(ImageFormat::WebP.mime(), "image/webp");
    }
}
