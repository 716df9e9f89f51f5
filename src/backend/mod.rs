//! Backend module - remote generation capability contract and its Gemini client

pub mod classify;
pub mod gemini;
pub mod traits;

pub use classify::{classify, RemoteErrorKind};
pub use gemini::GeminiBackend;
pub use traits::{ContentRequest, GenerationBackend, InlineImage, RemoteError, RequestPart, ResponsePart};
