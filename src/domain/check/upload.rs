//! Uploaded check image and the caller-side constraints on it.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Largest accepted upload, in bytes (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Media types accepted for analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Jpeg,
    Png,
    Webp,
    Pdf,
}

impl MediaType {
    pub const ALL: [MediaType; 4] = [MediaType::Jpeg, MediaType::Png, MediaType::Webp, MediaType::Pdf];

    /// MIME string sent to the model.
    pub fn as_mime(self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
            MediaType::Webp => "image/webp",
            MediaType::Pdf => "application/pdf",
        }
    }

    /// Guesses the media type from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(MediaType::Jpeg),
            "png" => Some(MediaType::Png),
            "webp" => Some(MediaType::Webp),
            "pdf" => Some(MediaType::Pdf),
            _ => None,
        }
    }
}

impl FromStr for MediaType {
    type Err = UploadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaType::ALL
            .into_iter()
            .find(|m| m.as_mime().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UploadError::UnsupportedMediaType(s.to_string()))
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mime())
    }
}

/// Reasons an upload is rejected before any network call.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Missing required fields: imageData and mimeType")]
    MissingFields,

    #[error("Unsupported file format '{0}'. Please upload JPG, PNG, WebP, or PDF files.")]
    UnsupportedMediaType(String),

    #[error("File size too large ({size} bytes). Please upload files smaller than 10MB.")]
    TooLarge { size: usize },

    #[error("File is empty")]
    Empty,

    #[error("imageData is not valid base64: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    #[error("Cannot read file: {0}")]
    Io(#[from] std::io::Error),
}

/// A validated check image: owned bytes plus declared media type.
///
/// Only constructible through validation, so every payload that reaches the
/// orchestrator is within the allow-list and the size limit.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    bytes: Vec<u8>,
    media_type: MediaType,
}

impl ImagePayload {
    /// Validates raw bytes against the size limit.
    pub fn new(bytes: Vec<u8>, media_type: MediaType) -> Result<Self, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(UploadError::TooLarge { size: bytes.len() });
        }
        Ok(Self { bytes, media_type })
    }

    /// Validates a base64 body field and its declared MIME string.
    pub fn from_base64(data: &str, mime_type: &str) -> Result<Self, UploadError> {
        let media_type = mime_type.parse::<MediaType>()?;
        let bytes = STANDARD.decode(data.trim())?;
        Self::new(bytes, media_type)
    }

    /// Reads and validates a file, inferring the media type from its extension.
    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        let media_type = MediaType::from_extension(ext)
            .ok_or_else(|| UploadError::UnsupportedMediaType(ext.to_string()))?;

        let size = std::fs::metadata(path)?.len() as usize;
        if size > MAX_UPLOAD_BYTES {
            return Err(UploadError::TooLarge { size });
        }

        Self::new(std::fs::read(path)?, media_type)
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Encodes the bytes for transport, consuming the payload.
    pub fn into_base64(self) -> String {
        STANDARD.encode(self.bytes)
    }
}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
