//! Functional tests for the workflow controller with a scripted backend

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;

use common::{controller, png_file, FakeBackend, PNG_HEADER};
use floorplan_render::backend::{InlineImage, RemoteError, RequestPart, ResponsePart};
use floorplan_render::prompt::{RenderingStyle, UPSCALE_PROMPT};
use floorplan_render::workflow::{Stage, Transition};

#[tokio::test]
async fn test_generate_then_download() {
    let backend = Arc::new(FakeBackend::new().reply_image("UkVTVUxU"));
    let controller = controller(backend.clone(), true);

    controller.upload_files(vec![png_file("plan.png"), png_file("attic.png")]);
    controller.set_style(RenderingStyle::Blueprint);
    controller.set_instructions("label the garage");

    assert_eq!(controller.generate().await, Transition::Applied);

    let view = controller.view();
    assert_eq!(view.stage, Stage::Ready);
    assert!(view.result.unwrap().data_url.starts_with("data:image/png;base64,UkVTVUxU"));
    assert!(view.can_upscale);

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].image_count(), 2);
    match &requests[0].parts[0] {
        RequestPart::Image(image) => assert!(!image.data.starts_with("data:")),
        other => panic!("expected image part first, got {:?}", other),
    }
    let prompt = requests[0].instruction().unwrap();
    assert!(prompt.contains(RenderingStyle::Blueprint.instruction()));
    assert!(prompt.contains("label the garage"));

    let artifact = controller.download().unwrap().unwrap();
    assert_eq!(artifact.filename, "plan-blueprint-3d-multi-view.png");
    assert_eq!(artifact.bytes, b"RESULT");
}

#[tokio::test]
async fn test_first_image_part_wins() {
    let backend = Arc::new(FakeBackend::new().reply(Ok(vec![
        ResponsePart::Text("rendered".to_string()),
        ResponsePart::Image(InlineImage::new("Rmlyc3Q=", "image/png")),
        ResponsePart::Image(InlineImage::new("U2Vjb25k", "image/png")),
    ])));
    let controller = controller(backend, true);
    controller.upload_files(vec![png_file("plan.png")]);

    controller.generate().await;

    let artifact = controller.download().unwrap().unwrap();
    assert_eq!(artifact.bytes, b"First");
}

#[tokio::test]
async fn test_no_image_in_response() {
    let backend = Arc::new(FakeBackend::new().reply(Ok(vec![ResponsePart::Text("no".to_string())])));
    let controller = controller(backend, true);
    controller.upload_files(vec![png_file("plan.png")]);

    controller.generate().await;

    let view = controller.view();
    assert_eq!(view.stage, Stage::Error);
    assert_eq!(view.error.unwrap().code, "no_image_returned");
    assert!(view.result.is_none());
}

#[tokio::test]
async fn test_generate_is_a_noop_while_in_flight() {
    let backend = Arc::new(FakeBackend::gated().reply_image("UkVTVUxU"));
    let controller = Arc::new(controller(backend.clone(), true));
    controller.upload_files(vec![png_file("plan.png")]);

    let running = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.generate().await })
    };
    backend.wait_for_calls(1).await;

    let view = controller.view();
    assert!(view.is_generating);
    assert!(!view.can_generate);

    assert_eq!(controller.generate().await, Transition::Ignored);
    assert_eq!(controller.upscale().await, Transition::Ignored);
    assert_eq!(backend.calls(), 1);

    backend.release();
    assert_eq!(running.await.unwrap(), Transition::Applied);
    assert_eq!(controller.view().stage, Stage::Ready);
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn test_invalid_key_is_distinct_from_transient() {
    let backend = Arc::new(
        FakeBackend::new()
            .reply(Err(RemoteError::http(400, "API key not valid. Please pass a valid API key.")))
            .reply(Err(RemoteError::http(500, "internal error"))),
    );
    let controller = controller(backend, true);
    controller.upload_files(vec![png_file("plan.png")]);

    controller.generate().await;
    let key_error = controller.view().error.unwrap();
    assert_eq!(key_error.code, "invalid_api_key");

    controller.generate().await;
    let transient = controller.view().error.unwrap();
    assert_eq!(transient.code, "transient_api_failure");

    assert_ne!(key_error.message, transient.message);
}

#[tokio::test]
async fn test_quota_on_generate() {
    let backend = Arc::new(FakeBackend::new().reply(Err(RemoteError::http(429, "quota"))));
    let controller = controller(backend, true);
    controller.upload_files(vec![png_file("plan.png")]);

    controller.generate().await;

    assert_eq!(controller.view().error.unwrap().code, "quota_exceeded");
}

#[tokio::test]
async fn test_offline_failure_reports_network() {
    let backend = Arc::new(FakeBackend::new().reply(Err(RemoteError::transport("connection refused"))));
    let controller = controller(backend, false);
    controller.upload_files(vec![png_file("plan.png")]);

    controller.generate().await;

    assert_eq!(controller.view().error.unwrap().code, "network_unavailable");
}

#[tokio::test]
async fn test_upscale_sends_single_image_and_renames_download() {
    let backend = Arc::new(FakeBackend::new().reply_image("UkVTVUxU").reply_image("QklHR0VS"));
    let controller = controller(backend.clone(), true);
    controller.upload_files(vec![png_file("plan.png"), png_file("roof.png")]);
    controller.set_style(RenderingStyle::Blueprint);
    controller.generate().await;

    assert_eq!(controller.upscale().await, Transition::Applied);

    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].image_count(), 1);
    assert_eq!(requests[1].instruction(), Some(UPSCALE_PROMPT));
    match &requests[1].parts[0] {
        RequestPart::Image(image) => assert_eq!(image.data, "UkVTVUxU"),
        other => panic!("expected image part, got {:?}", other),
    }

    let view = controller.view();
    assert_eq!(view.stage, Stage::Ready);
    assert!(view.result.unwrap().upscaled);
    assert!(!view.can_upscale);

    let artifact = controller.download().unwrap().unwrap();
    assert_eq!(artifact.filename, "plan-blueprint-upscaled.png");

    // already upscaled
    assert_eq!(controller.upscale().await, Transition::Ignored);
    assert_eq!(backend.calls(), 2);
}

#[tokio::test]
async fn test_upscale_quota_is_reported_as_transient() {
    let backend = Arc::new(
        FakeBackend::new()
            .reply_image("UkVTVUxU")
            .reply(Err(RemoteError::http(429, "quota"))),
    );
    let controller = controller(backend, true);
    controller.upload_files(vec![png_file("plan.png")]);
    controller.generate().await;

    controller.upscale().await;

    let view = controller.view();
    assert_eq!(view.error.unwrap().code, "transient_api_failure");
    assert!(view.can_download);
    let artifact = controller.download().unwrap().unwrap();
    assert_eq!(artifact.bytes, b"RESULT");
    assert_eq!(artifact.filename, "plan-realistic-3d-multi-view.png");
}

#[tokio::test]
async fn test_upload_paths_rejects_batch_with_unsupported_file() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("plan.png");
    let bad = dir.path().join("notes.txt");
    std::fs::write(&good, PNG_HEADER).unwrap();
    std::fs::write(&bad, b"just text").unwrap();

    let controller = controller(Arc::new(FakeBackend::new()), true);
    controller.upload_files(vec![png_file("existing.png")]);

    controller.upload_paths(vec![good.clone(), bad]).await;

    let view = controller.view();
    assert_eq!(view.images.len(), 1);
    assert_eq!(view.images[0].name, "existing.png");
    let error = view.error.unwrap();
    assert_eq!(error.code, "unsupported_type");
    assert!(error.message.contains("notes.txt"));

    controller.upload_paths(vec![good]).await;
    let view = controller.view();
    assert_eq!(view.stage, Stage::Staged);
    assert_eq!(view.images.len(), 2);
}

#[tokio::test]
async fn test_upload_paths_read_failure() {
    let dir = tempfile::tempdir().unwrap();
    let controller = controller(Arc::new(FakeBackend::new()), true);

    controller
        .upload_paths(vec![dir.path().join("missing.png")])
        .await;

    let view = controller.view();
    assert_eq!(view.stage, Stage::Error);
    let error = view.error.unwrap();
    assert_eq!(error.code, "read_error");
    assert!(error.message.contains("missing.png"));
}

#[tokio::test]
async fn test_generate_without_images() {
    let backend = Arc::new(FakeBackend::new());
    let controller = controller(backend.clone(), true);

    assert_eq!(controller.generate().await, Transition::Ignored);
    assert_eq!(controller.view().error.unwrap().code, "no_source_images");
    assert_eq!(backend.calls(), 0);
}
