//! Upload, configure, generate and upscale workflow
//!
//! [`state::Workflow`] is the pure state machine; [`controller::WorkflowController`]
//! drives it from async events and talks to the clients.

pub mod controller;
pub mod error;
pub mod state;

pub use controller::WorkflowController;
pub use error::WorkflowError;
pub use state::{Phase, RenderResult, SourceImage, Stage, Transition, Workflow, WorkflowView};
