//! Image codec - MIME allow-list, self-describing data URLs, and file reads

pub mod base64;
pub mod file;
pub mod mime;

pub use self::base64::EncodedImage;
pub use file::{read_path, RawFile};
pub use mime::MimeType;

use thiserror::Error;

/// Failures produced while turning an uploaded file into an encoded image
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Failed to read '{name}': {reason}")]
    Read { name: String, reason: String },

    #[error("Malformed data URL: {0}")]
    MalformedDataUrl(String),

    #[error("Invalid base64 data: {0}")]
    InvalidBase64(String),
}
