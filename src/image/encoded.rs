//! Data-URL encoded images.
//!
//! An [`EncodedImage`] carries its bytes as `data:<mime>;base64,<body>`, the
//! form an image display primitive renders directly. [`decode`] splits such a
//! payload back into the MIME type and base64 body the transform client needs.

use crate::error::{EditorError, Result};
use crate::image::format::OCTET_STREAM;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Label used when a file has no usable name.
const FALLBACK_LABEL: &str = "image";

/// An image held as a data URL, plus its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedImage {
    /// The payload: `data:<mime>;base64,<body>`.
    pub src: String,
    /// Display name, never empty.
    pub alt: String,
}

impl EncodedImage {
    /// Creates an image from an already encoded payload.
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        let alt = alt.into();
        Self {
            src: src.into(),
            alt: if alt.trim().is_empty() {
                FALLBACK_LABEL.to_string()
            } else {
                alt
            },
        }
    }

    /// Builds the payload from a MIME type and an already encoded base64 body.
    pub fn from_base64(mime_type: &str, base64_data: &str, alt: impl Into<String>) -> Self {
        Self::new(format!("data:{mime_type};base64,{base64_data}"), alt)
    }

    /// Splits the payload into MIME type and base64 body.
    pub fn decode(&self) -> DecodedPayload {
        decode(&self.src)
    }

    /// Returns the MIME type the payload declares (or the fallback).
    pub fn mime_type(&self) -> String {
        self.decode().mime.as_str().to_string()
    }

    /// Decodes the payload back into raw bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.decode().bytes()
    }

    /// Writes the decoded image bytes to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}

/// The MIME type recovered from a payload header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MimeType {
    /// The header declared this type.
    Declared(String),
    /// Nothing usable was declared; `application/octet-stream` stands in.
    Defaulted,
}

impl MimeType {
    /// Returns the effective MIME type string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Declared(mime) => mime,
            Self::Defaulted => OCTET_STREAM,
        }
    }

    /// Returns true if the header did not declare a type.
    pub fn is_defaulted(&self) -> bool {
        matches!(self, Self::Defaulted)
    }
}

impl std::fmt::Display for MimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payload split into its base64 body and MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    /// Base64 body (everything after the first comma).
    pub base64_data: String,
    /// MIME type from the header.
    pub mime: MimeType,
}

impl DecodedPayload {
    /// Decodes the base64 body.
    pub fn bytes(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.base64_data)
            .map_err(|e| EditorError::Decode(e.to_string()))
    }
}

/// Encodes raw bytes as a data-URL image.
pub fn encode_bytes(bytes: &[u8], mime_type: &str, label: impl Into<String>) -> EncodedImage {
    let body = base64::engine::general_purpose::STANDARD.encode(bytes);
    EncodedImage::from_base64(mime_type, &body, label)
}

/// Splits a data-URL payload into base64 body and MIME type.
///
/// Never fails: a payload without a comma has an empty body, and a header
/// without a `:<type>;` segment yields [`MimeType::Defaulted`].
pub fn decode(payload: &str) -> DecodedPayload {
    let (header, body) = payload.split_once(',').unwrap_or((payload, ""));

    let mime = header
        .split_once(':')
        .and_then(|(_, rest)| rest.split_once(';'))
        .map(|(mime, _)| mime)
        .filter(|mime| !mime.is_empty())
        .map_or(MimeType::Defaulted, |mime| MimeType::Declared(mime.to_string()));

    DecodedPayload {
        base64_data: body.to_string(),
        mime,
    }
}
