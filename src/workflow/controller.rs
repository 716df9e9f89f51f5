//! Async driver for the workflow state machine

use futures::future::join_all;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use super::state::{Transition, Workflow, WorkflowView};
use super::WorkflowError;
use crate::client::{GenerationClient, RenderError, UpscaleClient};
use crate::codec::{read_path, CodecError, RawFile};
use crate::download::DownloadArtifact;
use crate::health::ConnectivityProbe;
use crate::prompt::RenderingStyle;

/// Owns the session's workflow and runs generate/upscale calls.
///
/// The lock is only held for state transitions, never across a remote call,
/// so the state stays observable while a call is in flight.
pub struct WorkflowController {
    state: Mutex<Workflow>,
    generator: GenerationClient,
    upscaler: UpscaleClient,
    probe: Arc<dyn ConnectivityProbe>,
    advisory_max_bytes: usize,
}

impl WorkflowController {
    pub fn new(
        generator: GenerationClient,
        upscaler: UpscaleClient,
        probe: Arc<dyn ConnectivityProbe>,
        advisory_max_bytes: usize,
    ) -> Self {
        Self {
            state: Mutex::new(Workflow::new()),
            generator,
            upscaler,
            probe,
            advisory_max_bytes,
        }
    }

    pub fn view(&self) -> WorkflowView {
        self.state.lock().view()
    }

    /// Stage a batch of already-read files
    pub fn upload_files(&self, files: Vec<RawFile>) -> Transition {
        for file in files.iter().filter(|f| f.bytes.len() > self.advisory_max_bytes) {
            warn!(
                file = %file.name,
                size = file.bytes.len(),
                advisory_max = self.advisory_max_bytes,
                "Uploaded file exceeds advisory size"
            );
        }
        self.state.lock().upload(&files)
    }

    /// Read files concurrently, then stage them as one batch.
    ///
    /// Any read failure rejects the whole batch.
    pub async fn upload_paths(&self, paths: Vec<PathBuf>) -> Transition {
        let reads = join_all(paths.into_iter().map(read_path)).await;

        let files: Result<Vec<RawFile>, CodecError> = reads.into_iter().collect();
        match files {
            Ok(files) => self.upload_files(files),
            Err(error) => self.record_read_failure(error),
        }
    }

    /// Surface a file that could not be read by the upload surface
    pub fn record_read_failure(&self, error: CodecError) -> Transition {
        warn!(error = %error, "Failed to read uploaded file");
        let file = match error {
            CodecError::Read { name, .. } => name,
            other => other.to_string(),
        };
        self.state.lock().record_error(WorkflowError::Read { file })
    }

    pub fn remove_image(&self, index: usize) -> Transition {
        self.state.lock().remove(index)
    }

    pub fn set_style(&self, style: RenderingStyle) {
        self.state.lock().set_style(style);
    }

    pub fn set_instructions(&self, instructions: impl Into<String>) {
        self.state.lock().set_instructions(instructions);
    }

    pub fn reset(&self) -> Transition {
        self.state.lock().reset()
    }

    /// Run one generation. A no-op while any call is in flight.
    pub async fn generate(&self) -> Transition {
        let job = self.state.lock().begin_generation();
        let Some(job) = job else {
            return Transition::Ignored;
        };

        info!(images = job.images.len(), style = %job.style, "Generation started");

        let outcome = match self.generator.generate(job.images, job.style, &job.instructions).await {
            Ok(image) => Ok(image),
            Err(error) => Err(self.describe(error).await),
        };

        if let Err(error) = &outcome {
            warn!(code = error.code(), "Generation failed");
        }
        self.state.lock().complete_generation(outcome);
        Transition::Applied
    }

    /// Run one upscale of the current result. A no-op while any call is in
    /// flight or when the result is already upscaled.
    pub async fn upscale(&self) -> Transition {
        let image = self.state.lock().begin_upscale();
        let Some(image) = image else {
            return Transition::Ignored;
        };

        info!("Upscale started");

        let outcome = match self.upscaler.upscale(image).await {
            Ok(image) => Ok(image),
            Err(error) => Err(self.describe(error).await),
        };

        if let Err(error) = &outcome {
            warn!(code = error.code(), "Upscale failed");
        }
        self.state.lock().complete_upscale(outcome);
        Transition::Applied
    }

    pub fn download(&self) -> Result<Option<DownloadArtifact>, CodecError> {
        self.state.lock().download()
    }

    /// Turn a client failure into the message category shown to the user.
    ///
    /// Generic failures are checked against connectivity first.
    async fn describe(&self, error: RenderError) -> WorkflowError {
        match error {
            RenderError::NoImageReturned => WorkflowError::NoImageReturned,
            RenderError::InvalidApiKey(_) => WorkflowError::InvalidApiKey,
            RenderError::QuotaExceeded(_) => WorkflowError::QuotaExceeded,
            RenderError::TransientApiFailure(_) => {
                if self.probe.is_online().await {
                    WorkflowError::TransientApiFailure
                } else {
                    WorkflowError::NetworkUnavailable
                }
            }
        }
    }
}
