//! Reading user-provided files into encoded images

use std::path::Path;
use tokio::fs;
use tracing::debug;

use super::{CodecError, EncodedImage, MimeType};

/// A file as handed over by the upload surface
#[derive(Debug, Clone)]
pub struct RawFile {
    /// Display name, usually the original file name
    pub name: String,
    /// MIME type reported by the client, if any
    pub declared_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, declared_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.filter(|t| !t.trim().is_empty()),
            bytes,
        }
    }

    /// The MIME type that will be embedded in the encoded image.
    ///
    /// Generic types like `application/octet-stream` defer to magic-byte
    /// detection.
    pub fn effective_type(&self) -> String {
        match self.declared_type.as_deref() {
            Some(t) if t != "application/octet-stream" => t.to_ascii_lowercase(),
            _ => MimeType::sniff(&self.bytes)
                .unwrap_or("application/octet-stream")
                .to_string(),
        }
    }

    /// Encode into a self-describing data URL
    pub fn encode(&self) -> EncodedImage {
        EncodedImage::from_bytes(&self.bytes, &self.effective_type())
    }
}

/// Read a file from disk, inferring its declared type from the extension
pub async fn read_path<P: AsRef<Path>>(path: P) -> Result<RawFile, CodecError> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let bytes = fs::read(path).await.map_err(|e| CodecError::Read {
        name: name.clone(),
        reason: e.to_string(),
    })?;

    let declared_type = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(MimeType::declared_for_extension)
        .map(String::from);

    debug!(path = ?path, size = bytes.len(), "Read source file");

    Ok(RawFile::new(name, declared_type, bytes))
}
