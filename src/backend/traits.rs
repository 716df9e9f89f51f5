//! Common traits and types for the remote generation capability

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An inline image: bare base64 payload plus its MIME type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    /// Base64 payload without any `data:` prefix
    pub data: String,
    pub mime_type: String,
}

impl InlineImage {
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// One ordered input part of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPart {
    Image(InlineImage),
    Text(String),
}

/// A multimodal request: image parts followed by an instruction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentRequest {
    pub parts: Vec<RequestPart>,
}

impl ContentRequest {
    /// Images in the given order, then the instruction text
    pub fn new(images: Vec<InlineImage>, instruction: impl Into<String>) -> Self {
        let mut parts: Vec<RequestPart> = images.into_iter().map(RequestPart::Image).collect();
        parts.push(RequestPart::Text(instruction.into()));
        Self { parts }
    }

    pub fn image_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, RequestPart::Image(_)))
            .count()
    }

    pub fn instruction(&self) -> Option<&str> {
        self.parts.iter().find_map(|p| match p {
            RequestPart::Text(text) => Some(text.as_str()),
            RequestPart::Image(_) => None,
        })
    }
}

/// One part of the remote response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePart {
    Text(String),
    Image(InlineImage),
}

/// Error reported by the remote capability.
///
/// Carries the raw signals needed for classification; see
/// [`classify`](crate::backend::classify::classify).
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("{message}")]
pub struct RemoteError {
    /// HTTP status, absent for transport failures
    pub status: Option<u16>,
    /// Provider status string, e.g. `RESOURCE_EXHAUSTED`
    pub provider_status: Option<String>,
    /// Machine-readable reasons from the error details, e.g. `API_KEY_INVALID`
    pub reasons: Vec<String>,
    pub message: String,
}

impl RemoteError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
            ..Default::default()
        }
    }
}

/// Trait for the remote multimodal generation capability
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Get the backend name
    fn name(&self) -> &str;

    /// Submit ordered image and text parts, receive the response parts in order.
    ///
    /// Exactly one outbound call per invocation; no retries.
    async fn generate_content(&self, request: ContentRequest) -> Result<Vec<ResponsePart>, RemoteError>;
}
