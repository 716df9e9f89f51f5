//! Floor plan to 3D generation client

use std::sync::Arc;
use tracing::{debug, info};

use super::{first_image, RenderError};
use crate::backend::{ContentRequest, GenerationBackend, InlineImage};
use crate::prompt::{build_prompt, RenderingStyle};

/// Sends staged floor plans plus the built prompt to the backend
#[derive(Clone)]
pub struct GenerationClient {
    backend: Arc<dyn GenerationBackend>,
}

impl GenerationClient {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Generate a 3D rendering from one or more floor plan images.
    ///
    /// Images are attached in the given order. Returns the payload of the
    /// first image part of the response.
    pub async fn generate(
        &self,
        images: Vec<InlineImage>,
        style: RenderingStyle,
        custom_instructions: &str,
    ) -> Result<InlineImage, RenderError> {
        let prompt = build_prompt(style, custom_instructions, images.len());
        let request = ContentRequest::new(images, prompt);

        debug!(
            backend = %self.backend.name(),
            style = %style,
            images = request.image_count(),
            "Requesting 3D generation"
        );

        let parts = self.backend.generate_content(request).await?;
        let image = first_image(parts)?;

        info!(style = %style, mime_type = %image.mime_type, "3D generation succeeded");
        Ok(image)
    }
}
