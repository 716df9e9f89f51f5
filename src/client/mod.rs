//! Stateless request/response clients over the generation backend

pub mod generation;
pub mod upscale;

pub use generation::GenerationClient;
pub use upscale::UpscaleClient;

use thiserror::Error;
use tracing::warn;

use crate::backend::{classify, InlineImage, RemoteError, RemoteErrorKind, ResponsePart};

/// Failures of a single generate or upscale call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("No image data found in the API response")]
    NoImageReturned,

    #[error("The API key was rejected: {0}")]
    InvalidApiKey(String),

    #[error("API quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Remote call failed: {0}")]
    TransientApiFailure(String),
}

impl From<RemoteError> for RenderError {
    fn from(error: RemoteError) -> Self {
        let kind = classify(&error);
        warn!(kind = ?kind, status = ?error.status, message = %error.message, "Remote call failed");
        match kind {
            RemoteErrorKind::InvalidCredentials => RenderError::InvalidApiKey(error.message),
            RemoteErrorKind::QuotaExceeded => RenderError::QuotaExceeded(error.message),
            RemoteErrorKind::Other => RenderError::TransientApiFailure(error.message),
        }
    }
}

/// Payload of the first image-bearing part, ignoring any later ones
pub(crate) fn first_image(parts: Vec<ResponsePart>) -> Result<InlineImage, RenderError> {
    parts
        .into_iter()
        .find_map(|part| match part {
            ResponsePart::Image(image) => Some(image),
            ResponsePart::Text(_) => None,
        })
        .ok_or(RenderError::NoImageReturned)
}
