//! Product image normalization.
//!
//! Uploaded images are bounded to a square of `max_dimension` pixels,
//! flattened to RGB and re-encoded as JPEG before they are stored, so every
//! catalog image shares one format and a predictable size.

use std::{fmt, io::Cursor};

use image::{DynamicImage, ImageReader, Limits, codecs::jpeg::JpegEncoder, imageops::FilterType};

use crate::models::ImagePayload;

pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    UnsupportedType(String),
    TooLarge { size: usize, limit: usize },
    Decode(String),
    Encode(String),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::UnsupportedType(content_type) => {
                write!(f, "Unsupported file type '{}', expected an image", content_type)
            }
            ImageError::TooLarge { size, limit } => write!(
                f,
                "Image is too large ({} bytes), the limit is {} bytes",
                size, limit
            ),
            ImageError::Decode(msg) => write!(f, "Could not read image: {}", msg),
            ImageError::Encode(msg) => write!(f, "Could not encode image: {}", msg),
        }
    }
}

impl std::error::Error for ImageError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizerConfig {
    pub max_upload_bytes: usize,
    pub max_dimension: u32,
    pub jpeg_quality: u8,
    /// Largest width or height a source image may declare before decoding.
    pub max_source_dimension: u32,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 5 * 1024 * 1024,
            max_dimension: 800,
            jpeg_quality: 80,
            max_source_dimension: 8_000,
        }
    }
}

impl NormalizerConfig {
    /// Decoder limits: a small compressed file can still declare a huge
    /// raster, so both sides and the pixel buffer are capped.
    pub fn decode_limits(&self) -> Limits {
        let side = u64::from(self.max_source_dimension);

        let mut limits = Limits::default();
        limits.max_image_width = Some(self.max_source_dimension);
        limits.max_image_height = Some(self.max_source_dimension);
        limits.max_alloc = Some(side * side * 4);
        limits
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl NormalizedImage {
    pub fn content_type(&self) -> &'static str {
        JPEG_CONTENT_TYPE
    }

    pub fn into_payload(self, alt: impl Into<String>) -> ImagePayload {
        ImagePayload::from_bytes(&self.bytes, JPEG_CONTENT_TYPE, alt)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageNormalizer {
    config: NormalizerConfig,
}

impl ImageNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Rejects uploads by declared type and size, before anything is decoded.
    pub fn check_upload(&self, content_type: &str, len: usize) -> Result<(), ImageError> {
        if !content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
        {
            return Err(ImageError::UnsupportedType(content_type.to_string()));
        }

        if len > self.config.max_upload_bytes {
            return Err(ImageError::TooLarge {
                size: len,
                limit: self.config.max_upload_bytes,
            });
        }

        Ok(())
    }

    /// Scales the longer side down to `max_dimension`, keeping the aspect ratio.
    /// Images already inside the bound keep their size.
    pub fn target_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let max = self.config.max_dimension;

        if width >= height {
            let target_width = width.min(max);
            (target_width, scale_side(height, target_width, width))
        } else {
            let target_height = height.min(max);
            (scale_side(width, target_height, height), target_height)
        }
    }

    /// Decodes, bounds and re-encodes an upload as JPEG.
    pub fn process(&self, content_type: &str, bytes: &[u8]) -> Result<NormalizedImage, ImageError> {
        self.check_upload(content_type, bytes.len())?;

        let image = self.decode(bytes)?;

        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(ImageError::Decode("image has no pixels".to_string()));
        }

        let (target_width, target_height) = self.target_dimensions(width, height);
        tracing::debug!(
            "Normalizing {} image {}x{} -> {}x{}",
            content_type,
            width,
            height,
            target_width,
            target_height
        );

        let resized = if (target_width, target_height) == (width, height) {
            image
        } else {
            image.resize_exact(target_width, target_height, FilterType::Triangle)
        };

        Ok(NormalizedImage {
            bytes: self.encode_jpeg(&resized)?,
            width: target_width,
            height: target_height,
        })
    }

    pub fn normalize(&self, content_type: &str, bytes: &[u8]) -> Result<ImagePayload, ImageError> {
        Ok(self.process(content_type, bytes)?.into_payload(String::new()))
    }

    /// Runs [`process`](Self::process) on the blocking pool.
    pub async fn process_blocking(
        self,
        content_type: String,
        bytes: Vec<u8>,
    ) -> crate::error::Result<NormalizedImage> {
        let image = tokio::task::spawn_blocking(move || self.process(&content_type, &bytes))
            .await
            .map_err(|e| {
                crate::error::AppError::InternalError(format!("Image task failed: {}", e))
            })??;

        Ok(image)
    }

    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, ImageError> {
        let mut reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| ImageError::Decode(e.to_string()))?;
        reader.limits(self.config.decode_limits());

        reader.decode().map_err(|e| ImageError::Decode(e.to_string()))
    }

    fn encode_jpeg(&self, image: &DynamicImage) -> Result<Vec<u8>, ImageError> {
        // JPEG has no alpha channel
        let rgb = image.to_rgb8();

        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, self.config.jpeg_quality)
            .encode_image(&rgb)
            .map_err(|e| ImageError::Encode(e.to_string()))?;

        Ok(out)
    }
}

fn scale_side(side: u32, numerator: u32, denominator: u32) -> u32 {
    let scaled = (u64::from(side) * u64::from(numerator) + u64::from(denominator) / 2)
        / u64::from(denominator);

    scaled.clamp(1, u64::from(u32::MAX)) as u32
}
