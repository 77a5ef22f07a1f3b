use base64::{Engine as _, engine::general_purpose::STANDARD as Base64};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Image as it travels in product JSON bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    pub data: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
    #[serde(default)]
    pub alt: String,
}

impl ImagePayload {
    pub fn from_bytes(bytes: &[u8], content_type: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            data: Base64.encode(bytes),
            content_type: content_type.into(),
            alt: alt.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.trim().is_empty()
    }

    pub fn decode_data(&self) -> Result<Vec<u8>> {
        // tolerate data URLs pasted straight from a browser
        let data = match self.data.split_once(";base64,") {
            Some((prefix, rest)) if prefix.starts_with("data:") => rest,
            _ => self.data.as_str(),
        };

        Base64
            .decode(data.trim())
            .map_err(|_| AppError::BadRequest("Image data is not valid base64".to_string()))
    }
}

/// Normalizer output returned to the admin console for previews.
#[derive(Debug, Serialize)]
pub struct NormalizedImageResponse {
    #[serde(flatten)]
    pub image: ImagePayload,
    pub width: u32,
    pub height: u32,
    pub size: usize,
}
