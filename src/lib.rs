//! Floor plan to 3D rendering service
//!
//! Stages 2D architectural floor plans, builds a structured prompt for a
//! multimodal image model, and runs generate/upscale passes against it.

pub mod api;
pub mod backend;
pub mod client;
pub mod codec;
pub mod config;
pub mod download;
pub mod error;
pub mod health;
pub mod prompt;
pub mod workflow;

pub use error::{AppError, Result};

use std::sync::Arc;

use download::ExportStore;
use workflow::WorkflowController;

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Arc<config::Settings>,
    pub controller: Arc<WorkflowController>,
    pub export_store: ExportStore,
}
