//! Upscale pass over an already generated image

use std::sync::Arc;
use tracing::{debug, info};

use super::{first_image, RenderError};
use crate::backend::{ContentRequest, GenerationBackend, InlineImage};
use crate::prompt::UPSCALE_PROMPT;

/// Sends a single image back with the fixed enhancement instruction
#[derive(Clone)]
pub struct UpscaleClient {
    backend: Arc<dyn GenerationBackend>,
}

impl UpscaleClient {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Enhance resolution and detail of exactly one image.
    ///
    /// Quota signals are reported as transient failures on this path.
    pub async fn upscale(&self, image: InlineImage) -> Result<InlineImage, RenderError> {
        let request = ContentRequest::new(vec![image], UPSCALE_PROMPT);

        debug!(backend = %self.backend.name(), "Requesting upscale");

        let parts = self
            .backend
            .generate_content(request)
            .await
            .map_err(|e| match RenderError::from(e) {
                RenderError::QuotaExceeded(message) => RenderError::TransientApiFailure(message),
                other => other,
            })?;
        let image = first_image(parts)?;

        info!(mime_type = %image.mime_type, "Upscale succeeded");
        Ok(image)
    }
}
