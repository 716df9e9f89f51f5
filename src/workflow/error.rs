//! User-facing workflow failures

use thiserror::Error;

/// Every failure the workflow can show to the user.
///
/// The display text is the message shown in the error slot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Failed to read the image file '{file}'. Please try again.")]
    Read { file: String },

    #[error("'{file}' is not a supported image type ({mime_type}). Allowed types: PNG, JPEG, WEBP, BMP, TIFF.")]
    UnsupportedType { file: String, mime_type: String },

    #[error("Please upload at least one floor plan image first.")]
    NoSourceImages,

    #[error("The model did not return an image. Try again or adjust your instructions.")]
    NoImageReturned,

    #[error("The API key is invalid. Check the GEMINI_API_KEY configuration.")]
    InvalidApiKey,

    #[error("The API usage quota has been exceeded. Check your plan or try again later.")]
    QuotaExceeded,

    #[error("An error occurred while talking to the generation service. Please try again.")]
    TransientApiFailure,

    #[error("No network connection. Check your internet connection and try again.")]
    NetworkUnavailable,
}

impl WorkflowError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "read_error",
            Self::UnsupportedType { .. } => "unsupported_type",
            Self::NoSourceImages => "no_source_images",
            Self::NoImageReturned => "no_image_returned",
            Self::InvalidApiKey => "invalid_api_key",
            Self::QuotaExceeded => "quota_exceeded",
            Self::TransientApiFailure => "transient_api_failure",
            Self::NetworkUnavailable => "network_unavailable",
        }
    }

    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
