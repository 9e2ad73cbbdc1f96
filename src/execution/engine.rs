//! Transform engine implementation.
//!
//! The engine turns a data-URI image and a style id into a new JPEG data URI.
//! It never fails outright: when the image cannot be processed the caller
//! gets the original input back together with the reason.

use crate::core::config::ToonifyConfig;
use crate::core::diagnostics::{Diagnostic, DiagnosticSink};
use crate::core::error::TransformError;
use crate::core::types::{DataUri, ImageFormat};
use crate::filters::builtin::apply_recipe;
use crate::filters::catalog::StyleCatalog;
use crate::filters::recipe::FilterRecipe;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Engine options.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Delay before processing starts.
    pub processing_delay: Duration,
    /// Upper bound on a whole transform, delay included.
    pub timeout: Duration,
    /// JPEG quality of the output (1-100).
    pub jpeg_quality: u8,
    /// Where recovered failures are reported.
    pub diagnostics: DiagnosticSink,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            processing_delay: Duration::from_millis(2000),
            timeout: Duration::from_secs(30),
            jpeg_quality: 85,
            diagnostics: DiagnosticSink::none(),
        }
    }
}

impl EngineOptions {
    /// Create a new options builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options taken from a loaded configuration.
    pub fn from_config(config: &ToonifyConfig) -> Self {
        Self {
            processing_delay: config.processing_delay(),
            timeout: config.transform_timeout(),
            jpeg_quality: config.jpeg_quality,
            diagnostics: DiagnosticSink::none(),
        }
    }

    /// Set the processing delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.processing_delay = delay;
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set JPEG quality, clamped to 1-100.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Set the diagnostic sink.
    pub fn with_diagnostics(mut self, diagnostics: DiagnosticSink) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

/// How a transform ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformStatus {
    /// The style's recipe was applied.
    Applied,
    /// The style was unknown; the identity recipe was applied.
    UnknownStyle,
    /// Processing failed; the output is the original input.
    Fallback(TransformError),
}

/// Result of [`TransformEngine::transform`].
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutput {
    /// Data URI of the result (or of the original on fallback).
    pub image: String,
    /// How the transform ended.
    pub status: TransformStatus,
}

impl TransformOutput {
    /// Whether the original image was returned unmodified.
    pub fn is_fallback(&self) -> bool {
        matches!(self.status, TransformStatus::Fallback(_))
    }

    /// User-facing notice, if one should be shown.
    pub fn notice(&self) -> Option<&'static str> {
        match &self.status {
            TransformStatus::Fallback(error) => Some(error.user_message()),
            _ => None,
        }
    }
}

/// Applies catalog styles to images.
pub struct TransformEngine {
    catalog: Arc<StyleCatalog>,
    options: EngineOptions,
}

impl TransformEngine {
    /// Create an engine over `catalog`.
    pub fn new(catalog: Arc<StyleCatalog>, options: EngineOptions) -> Self {
        Self { catalog, options }
    }

    /// The catalog styles are resolved against.
    pub fn catalog(&self) -> &StyleCatalog {
        &self.catalog
    }

    /// Current options.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Apply `style_id` to `image_data_uri`.
    ///
    /// Decoding, filtering and encoding run on the blocking thread pool, so
    /// the calling task only suspends. The returned future always resolves;
    /// on decode failure, non-image input, worker failure or timeout the
    /// output carries the original input and a [`TransformStatus::Fallback`].
    pub async fn transform(&self, image_data_uri: &str, style_id: &str) -> TransformOutput {
        let start = Instant::now();
        let recipe = self.resolve(style_id);
        let known = self.catalog.contains(style_id);

        let input = image_data_uri.to_string();
        let quality = self.options.jpeg_quality;
        let delay = self.options.processing_delay;
        let work = async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            tokio::task::spawn_blocking(move || render_data_uri(&input, &recipe, quality)).await
        };

        let result = match tokio::time::timeout(self.options.timeout, work).await {
            Ok(Ok(rendered)) => rendered,
            Ok(Err(join_error)) => Err(TransformError::WorkerFailed(join_error.to_string())),
            Err(_) => Err(TransformError::TimedOut {
                after_ms: self.options.timeout.as_millis() as u64,
            }),
        };

        self.finish(image_data_uri, style_id, known, result, start)
    }

    /// Apply `style_id` on the current thread, without delay or timeout.
    pub fn transform_blocking(&self, image_data_uri: &str, style_id: &str) -> TransformOutput {
        let start = Instant::now();
        let recipe = self.resolve(style_id);
        let known = self.catalog.contains(style_id);
        let result = render_data_uri(image_data_uri, &recipe, self.options.jpeg_quality);
        self.finish(image_data_uri, style_id, known, result, start)
    }

    /// Render a decoded image with a style, before any encoding.
    pub fn render(&self, image: &DynamicImage, style_id: &str) -> RgbaImage {
        apply_recipe(image, &self.catalog.recipe_for(style_id))
    }

    fn resolve(&self, style_id: &str) -> FilterRecipe {
        if !self.catalog.contains(style_id) {
            self.options.diagnostics.emit(Diagnostic::UnknownStyle {
                style_id: style_id.to_string(),
            });
        }
        self.catalog.recipe_for(style_id)
    }

    fn finish(
        &self,
        original: &str,
        style_id: &str,
        known: bool,
        result: Result<String, TransformError>,
        start: Instant,
    ) -> TransformOutput {
        match result {
            Ok(image) => {
                log::debug!(
                    "transformed image with style '{}' in {} ms",
                    style_id,
                    start.elapsed().as_millis()
                );
                TransformOutput {
                    image,
                    status: if known {
                        TransformStatus::Applied
                    } else {
                        TransformStatus::UnknownStyle
                    },
                }
            }
            Err(error) => {
                self.options.diagnostics.emit(Diagnostic::TransformFallback {
                    style_id: style_id.to_string(),
                    reason: error.to_string(),
                });
                TransformOutput {
                    image: original.to_string(),
                    status: TransformStatus::Fallback(error),
                }
            }
        }
    }
}

/// Decode, filter and re-encode a data URI.
pub fn render_data_uri(
    input: &str,
    recipe: &FilterRecipe,
    quality: u8,
) -> Result<String, TransformError> {
    let source = DataUri::parse(input)?;
    let image = source.decode_image()?;
    let rendered = apply_recipe(&image, recipe);
    Ok(encode_jpeg(rendered, quality)?.to_string())
}

/// Encode pixels as a JPEG data URI.
///
/// JPEG has no alpha channel, so pixels are composited onto black first:
/// fully transparent areas come out black.
pub fn encode_jpeg(image: RgbaImage, quality: u8) -> Result<DataUri, TransformError> {
    let rgb = flatten_on_black(&image);
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
    encoder
        .encode_image(&rgb)
        .map_err(|e| TransformError::Encode(e.to_string()))?;
    Ok(DataUri::new(ImageFormat::Jpeg.mime(), bytes))
}

fn flatten_on_black(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        let scale = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
        Rgb([scale(r), scale(g), scale(b)])
    })
}
