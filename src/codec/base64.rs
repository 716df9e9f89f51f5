//! Base64 data URLs carrying their MIME type inline

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::CodecError;

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Encode binary data to base64 string
pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode a bare base64 payload
pub fn decode(payload: &str) -> Result<Vec<u8>, CodecError> {
    STANDARD
        .decode(payload.trim())
        .map_err(|e| CodecError::InvalidBase64(e.to_string()))
}

/// A self-describing encoded image: `data:<mime>;base64,<payload>`.
///
/// The MIME type stored here is whatever the data URL declares; it is not
/// checked against the allow-list until a `SourceImage` is built from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EncodedImage {
    url: String,
    split: usize,
}

impl EncodedImage {
    /// Build a data URL from raw bytes
    pub fn from_bytes(data: &[u8], mime_type: &str) -> Self {
        Self::from_payload(&encode(data), mime_type)
    }

    /// Build a data URL from an already base64-encoded payload
    pub fn from_payload(payload: &str, mime_type: &str) -> Self {
        let url = format!("{}{}{}{}", DATA_PREFIX, mime_type, BASE64_MARKER, payload);
        let split = DATA_PREFIX.len() + mime_type.len();
        Self { url, split }
    }

    /// Parse a data URL string
    pub fn parse(url: impl Into<String>) -> Result<Self, CodecError> {
        let url = url.into();
        if !url.starts_with(DATA_PREFIX) {
            return Err(CodecError::MalformedDataUrl("missing 'data:' prefix".to_string()));
        }
        let split = url
            .find(BASE64_MARKER)
            .ok_or_else(|| CodecError::MalformedDataUrl("missing ';base64,' marker".to_string()))?;
        if split == DATA_PREFIX.len() {
            return Err(CodecError::MalformedDataUrl("empty MIME type".to_string()));
        }
        Ok(Self { url, split })
    }

    /// The MIME type declared inside the data URL
    pub fn mime_type(&self) -> &str {
        &self.url[DATA_PREFIX.len()..self.split]
    }

    /// The base64 payload with the transport prefix stripped
    pub fn payload(&self) -> &str {
        &self.url[self.split + BASE64_MARKER.len()..]
    }

    /// Decode the payload back to bytes
    pub fn decode(&self) -> Result<Vec<u8>, CodecError> {
        decode(self.payload())
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl TryFrom<String> for EncodedImage {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EncodedImage> for String {
    fn from(value: EncodedImage) -> Self {
        value.url
    }
}
