//! Test doubles shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use floorplan_render::backend::{ContentRequest, GenerationBackend, InlineImage, RemoteError, ResponsePart};
use floorplan_render::client::{GenerationClient, UpscaleClient};
use floorplan_render::codec::RawFile;
use floorplan_render::health::ConnectivityProbe;
use floorplan_render::workflow::WorkflowController;

pub const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Scripted backend: replies are popped in order, requests are recorded
pub struct FakeBackend {
    replies: Mutex<VecDeque<Result<Vec<ResponsePart>, RemoteError>>>,
    requests: Mutex<Vec<ContentRequest>>,
    calls: AtomicUsize,
    gate: Option<Semaphore>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    /// Calls block until `release` is called once per call
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new()
        }
    }

    pub fn reply(self, reply: Result<Vec<ResponsePart>, RemoteError>) -> Self {
        self.replies.lock().push_back(reply);
        self
    }

    pub fn reply_image(self, data: &str) -> Self {
        self.reply(Ok(vec![ResponsePart::Image(InlineImage::new(data, "image/png"))]))
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ContentRequest> {
        self.requests.lock().clone()
    }

    /// Wait until at least `n` calls have started
    pub async fn wait_for_calls(&self, n: usize) {
        for _ in 0..200 {
            if self.calls() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("backend was not called {} times", n);
    }
}

#[async_trait]
impl GenerationBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    async fn generate_content(&self, request: ContentRequest) -> Result<Vec<ResponsePart>, RemoteError> {
        self.requests.lock().push(request);
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(RemoteError::http(500, "no scripted reply")))
    }
}

pub struct FakeProbe {
    pub online: bool,
}

#[async_trait]
impl ConnectivityProbe for FakeProbe {
    async fn is_online(&self) -> bool {
        self.online
    }
}

pub fn controller(backend: Arc<FakeBackend>, online: bool) -> WorkflowController {
    WorkflowController::new(
        GenerationClient::new(backend.clone()),
        UpscaleClient::new(backend),
        Arc::new(FakeProbe { online }),
        5 * 1024 * 1024,
    )
}

pub fn png_file(name: &str) -> RawFile {
    let mut bytes = PNG_HEADER.to_vec();
    bytes.extend_from_slice(name.as_bytes());
    RawFile::new(name, Some("image/png".to_string()), bytes)
}
