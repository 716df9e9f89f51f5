//! Workflow state machine
//!
//! Staged images, style and instructions live alongside a single [`Phase`]
//! value; every in-flight/result/error combination is a distinct variant.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::mem;
use tracing::{debug, info};
use uuid::Uuid;

use super::WorkflowError;
use crate::backend::InlineImage;
use crate::codec::{CodecError, EncodedImage, MimeType, RawFile};
use crate::download::{download_filename, DownloadArtifact};
use crate::prompt::RenderingStyle;

/// MIME type assumed for results whose part carried none
const DEFAULT_RESULT_MIME: &str = "image/png";

/// A validated, staged floor plan image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub encoded: EncodedImage,
    pub mime_type: MimeType,
    pub name: String,
}

impl SourceImage {
    /// Validate an encoded image against the allow-list.
    ///
    /// The embedded MIME type must be allowed and, when the client declared a
    /// type, both must agree.
    pub fn from_encoded(
        name: impl Into<String>,
        encoded: EncodedImage,
        declared_type: Option<&str>,
    ) -> Result<Self, WorkflowError> {
        let name = name.into();
        let unsupported = |mime_type: &str| WorkflowError::UnsupportedType {
            file: name.clone(),
            mime_type: mime_type.to_string(),
        };

        let mime_type = MimeType::parse(encoded.mime_type()).ok_or_else(|| unsupported(encoded.mime_type()))?;

        if let Some(declared) = declared_type {
            if MimeType::parse(declared) != Some(mime_type) {
                return Err(unsupported(declared));
            }
        }

        Ok(Self {
            encoded,
            mime_type,
            name,
        })
    }

    pub fn from_raw(file: &RawFile) -> Result<Self, WorkflowError> {
        Self::from_encoded(file.name.clone(), file.encode(), None)
    }

    /// Payload with the transport prefix stripped, ready for the backend
    pub fn to_inline(&self) -> InlineImage {
        InlineImage::new(self.encoded.payload(), self.mime_type.as_str())
    }
}

/// The current generation or upscale output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    pub id: Uuid,
    pub image: EncodedImage,
    pub upscaled: bool,
    pub created_at: DateTime<Utc>,
}

impl RenderResult {
    pub fn new(image: InlineImage, upscaled: bool) -> Self {
        let mime_type = if image.mime_type.is_empty() {
            DEFAULT_RESULT_MIME
        } else {
            image.mime_type.as_str()
        };

        Self {
            id: Uuid::new_v4(),
            image: EncodedImage::from_payload(&image.data, mime_type),
            upscaled,
            created_at: Utc::now(),
        }
    }

    pub fn to_inline(&self) -> InlineImage {
        InlineImage::new(self.image.payload(), self.image.mime_type())
    }
}

/// What the workflow is doing right now
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing in flight, no result, no error
    #[default]
    Idle,
    Generating,
    Ready(RenderResult),
    /// Upscaling the contained result, which stays visible meanwhile
    Upscaling(RenderResult),
    /// An error is shown; a result that survived the failure is kept for
    /// download and further upscaling
    Failed {
        error: WorkflowError,
        retained: Option<RenderResult>,
    },
}

/// Externally visible stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Empty,
    Staged,
    Generating,
    Ready,
    Upscaling,
    Error,
}

/// Whether an event changed the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    Ignored,
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied)
    }
}

/// Inputs captured when a generation starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationJob {
    pub images: Vec<InlineImage>,
    pub style: RenderingStyle,
    pub instructions: String,
}

/// The aggregate workflow state
#[derive(Debug, Clone, Default)]
pub struct Workflow {
    sources: Vec<SourceImage>,
    style: RenderingStyle,
    instructions: String,
    phase: Phase,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sources(&self) -> &[SourceImage] {
        &self.sources
    }

    pub fn style(&self) -> RenderingStyle {
        self.style
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn stage(&self) -> Stage {
        match &self.phase {
            Phase::Idle if self.sources.is_empty() => Stage::Empty,
            Phase::Idle => Stage::Staged,
            Phase::Generating => Stage::Generating,
            Phase::Ready(_) => Stage::Ready,
            Phase::Upscaling(_) => Stage::Upscaling,
            Phase::Failed { .. } => Stage::Error,
        }
    }

    /// A generate or upscale call is outstanding
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Generating | Phase::Upscaling(_))
    }

    /// The result available for download, visible or retained
    pub fn current_result(&self) -> Option<&RenderResult> {
        match &self.phase {
            Phase::Ready(result) | Phase::Upscaling(result) => Some(result),
            Phase::Failed { retained, .. } => retained.as_ref(),
            Phase::Idle | Phase::Generating => None,
        }
    }

    pub fn error(&self) -> Option<&WorkflowError> {
        match &self.phase {
            Phase::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn can_generate(&self) -> bool {
        !self.is_busy() && !self.sources.is_empty()
    }

    pub fn can_upscale(&self) -> bool {
        match &self.phase {
            Phase::Ready(result) => !result.upscaled,
            Phase::Failed { retained: Some(result), .. } => !result.upscaled,
            _ => false,
        }
    }

    /// Stage a batch of files atomically.
    ///
    /// The first file outside the allow-list rejects the whole batch and the
    /// staged list is left untouched.
    pub fn upload(&mut self, files: &[RawFile]) -> Transition {
        if self.is_busy() || files.is_empty() {
            return Transition::Ignored;
        }

        let admitted: Result<Vec<SourceImage>, WorkflowError> = files.iter().map(SourceImage::from_raw).collect();

        match admitted {
            Ok(images) => {
                info!(count = images.len(), total = self.sources.len() + images.len(), "Staged floor plans");
                self.sources.extend(images);
                self.phase = Phase::Idle;
            }
            Err(error) => {
                info!(error = %error, "Rejected upload batch");
                self.fail(error);
            }
        }
        Transition::Applied
    }

    /// Surface an error that happened outside the state machine, e.g. a read failure
    pub fn record_error(&mut self, error: WorkflowError) -> Transition {
        if self.is_busy() {
            return Transition::Ignored;
        }
        self.fail(error);
        Transition::Applied
    }

    /// Remove the staged image at `index`; out-of-range indices are ignored
    pub fn remove(&mut self, index: usize) -> Transition {
        if self.is_busy() || index >= self.sources.len() {
            return Transition::Ignored;
        }
        let removed = self.sources.remove(index);
        debug!(name = %removed.name, remaining = self.sources.len(), "Removed floor plan");
        self.phase = Phase::Idle;
        Transition::Applied
    }

    pub fn set_style(&mut self, style: RenderingStyle) {
        self.style = style;
    }

    pub fn set_instructions(&mut self, instructions: impl Into<String>) {
        self.instructions = instructions.into();
    }

    /// Drop everything; not allowed while a call is in flight
    pub fn reset(&mut self) -> Transition {
        if self.is_busy() {
            return Transition::Ignored;
        }
        *self = Self::default();
        Transition::Applied
    }

    /// Enter `Generating`, clearing any result and error.
    ///
    /// Returns `None` when nothing should be sent.
    pub fn begin_generation(&mut self) -> Option<GenerationJob> {
        if self.is_busy() {
            return None;
        }
        if self.sources.is_empty() {
            self.fail(WorkflowError::NoSourceImages);
            return None;
        }

        self.phase = Phase::Generating;
        Some(GenerationJob {
            images: self.sources.iter().map(SourceImage::to_inline).collect(),
            style: self.style,
            instructions: self.instructions.clone(),
        })
    }

    pub fn complete_generation(&mut self, outcome: Result<InlineImage, WorkflowError>) {
        if self.phase != Phase::Generating {
            debug!("Ignoring generation outcome outside Generating");
            return;
        }
        self.phase = match outcome {
            Ok(image) => Phase::Ready(RenderResult::new(image, false)),
            Err(error) => Phase::Failed { error, retained: None },
        };
    }

    /// Enter `Upscaling` and hand back the image to send.
    ///
    /// Only a result that is not already upscaled qualifies.
    pub fn begin_upscale(&mut self) -> Option<InlineImage> {
        if !self.can_upscale() {
            return None;
        }
        let result = match mem::take(&mut self.phase) {
            Phase::Ready(result) => result,
            Phase::Failed { retained: Some(result), .. } => result,
            other => {
                self.phase = other;
                return None;
            }
        };
        let image = result.to_inline();
        self.phase = Phase::Upscaling(result);
        Some(image)
    }

    /// On failure the previous result is retained alongside the error
    pub fn complete_upscale(&mut self, outcome: Result<InlineImage, WorkflowError>) {
        let previous = match mem::take(&mut self.phase) {
            Phase::Upscaling(previous) => previous,
            other => {
                debug!("Ignoring upscale outcome outside Upscaling");
                self.phase = other;
                return;
            }
        };
        self.phase = match outcome {
            Ok(image) => Phase::Ready(RenderResult::new(image, true)),
            Err(error) => Phase::Failed {
                error,
                retained: Some(previous),
            },
        };
    }

    /// Build the download artifact for the current result, if any
    pub fn download(&self) -> Result<Option<DownloadArtifact>, CodecError> {
        let Some(result) = self.current_result() else {
            return Ok(None);
        };

        let filename = download_filename(
            self.sources.first().map(|s| s.name.as_str()),
            self.style,
            result.upscaled,
        );

        Ok(Some(DownloadArtifact {
            filename,
            mime_type: result.image.mime_type().to_string(),
            bytes: result.image.decode()?,
        }))
    }

    fn fail(&mut self, error: WorkflowError) {
        let retained = match mem::take(&mut self.phase) {
            Phase::Ready(result) => Some(result),
            Phase::Failed { retained, .. } => retained,
            Phase::Idle | Phase::Generating | Phase::Upscaling(_) => None,
        };
        self.phase = Phase::Failed { error, retained };
    }

    pub fn view(&self) -> WorkflowView {
        let stage = self.stage();
        let result = match &self.phase {
            Phase::Ready(result) | Phase::Upscaling(result) => Some(ResultView::from(result)),
            _ => None,
        };

        WorkflowView {
            stage,
            images: self
                .sources
                .iter()
                .enumerate()
                .map(|(index, source)| SourceImageView {
                    index,
                    name: source.name.clone(),
                    mime_type: source.mime_type.as_str(),
                    data_url: source.encoded.to_string(),
                })
                .collect(),
            style: self.style,
            instructions: self.instructions.clone(),
            result,
            error: self.error().map(|error| ErrorView {
                code: error.code(),
                message: error.user_message(),
            }),
            can_generate: self.can_generate(),
            can_upscale: self.can_upscale(),
            can_download: self.current_result().is_some(),
            is_generating: stage == Stage::Generating,
            is_upscaling: stage == Stage::Upscaling,
        }
    }
}

/// Serializable snapshot of the workflow for the UI surface
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowView {
    pub stage: Stage,
    pub images: Vec<SourceImageView>,
    pub style: RenderingStyle,
    pub instructions: String,
    /// Shown only when no error is displayed
    pub result: Option<ResultView>,
    pub error: Option<ErrorView>,
    pub can_generate: bool,
    pub can_upscale: bool,
    pub can_download: bool,
    pub is_generating: bool,
    pub is_upscaling: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceImageView {
    pub index: usize,
    pub name: String,
    pub mime_type: &'static str,
    pub data_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    pub id: Uuid,
    pub data_url: String,
    pub upscaled: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&RenderResult> for ResultView {
    fn from(result: &RenderResult) -> Self {
        Self {
            id: result.id,
            data_url: result.image.to_string(),
            upscaled: result.upscaled,
            created_at: result.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorView {
    pub code: &'static str,
    pub message: String,
}
