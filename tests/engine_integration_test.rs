#![cfg(feature = "cli")]

use form_prep::domain::ports::{ImageSource, Notifier};
use form_prep::{
    CliConfig, CompressionOptions, FileInput, HttpSource, ImageKind, ImageOptimizer, LocalSource,
    PreviewPane, UploadEngine,
};
use httpmock::prelude::*;
use image::{DynamicImage, Rgba, RgbaImage};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Clone, Default)]
struct RecordingNotifier {
    alerts: Arc<Mutex<Vec<String>>>,
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

impl RecordingNotifier {
    fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

fn test_config(max_upload_size: u64) -> CliConfig {
    CliConfig {
        input: String::new(),
        output_path: "./output".to_string(),
        preview_base: "http://localhost:8080".to_string(),
        preview_path: "uploads".to_string(),
        max_upload_size,
        supported_types: vec![
            "image/jpeg".to_string(),
            "image/png".to_string(),
            "image/webp".to_string(),
            "image/gif".to_string(),
        ],
        config: None,
        verbose: false,
        monitor: false,
        compression: CompressionOptions::default(),
    }
}

fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        width,
        height,
        Rgba([200, 100, 50, 255]),
    ));
    let mut out = std::io::Cursor::new(Vec::new());
    image.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

#[tokio::test]
async fn test_end_to_end_with_local_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("photo.png"), sample_png(320, 240)).unwrap();

    let source = LocalSource::new(dir.path().to_str().unwrap().to_string());
    let file = source.fetch("photo.png").await.unwrap();
    assert_eq!(file.mime, "image/png");

    let mut input = FileInput::new();
    input.select(file);
    let mut pane = PreviewPane::new("image-preview");

    let config = test_config(2 * 1024 * 1024);
    let notifier = RecordingNotifier::default();
    let engine = UploadEngine::new(
        ImageOptimizer::new(config.clone()),
        config,
        notifier.clone(),
    );

    let optimized = engine.submit(&mut input, &mut pane).await.unwrap();

    assert!(notifier.alerts().is_empty());
    assert!(optimized.name.starts_with("photo_opt."));
    assert!(optimized.size() <= 2 * 1024 * 1024);
    // Small source stays at its own dimensions.
    assert_eq!((optimized.width, optimized.height), (320, 240));

    // The input now holds the optimized file, not the original selection.
    let swapped = input.selection().unwrap();
    assert_eq!(swapped.name, optimized.name);
    assert_eq!(swapped.mime, optimized.kind.mime());
    assert!(swapped.last_modified.is_some());

    assert!(!pane.is_empty());
}

#[tokio::test]
async fn test_end_to_end_with_remote_image() {
    let server = MockServer::start();
    let image_mock = server.mock(|when, then| {
        when.method(GET).path("/media/team-photo.png");
        then.status(200)
            .header("Content-Type", "image/png")
            .body(sample_png(64, 64));
    });

    let file = HttpSource::new()
        .fetch(&server.url("/media/team-photo.png"))
        .await
        .unwrap();

    image_mock.assert();
    assert_eq!(file.mime, "image/png");
    assert_eq!(file.name, "team-photo.png");

    let mut input = FileInput::new();
    input.select(file);
    let mut pane = PreviewPane::new("image-preview");

    let config = test_config(2 * 1024 * 1024);
    let notifier = RecordingNotifier::default();
    let engine = UploadEngine::new(
        ImageOptimizer::new(config.clone()),
        config,
        notifier.clone(),
    );

    let optimized = engine.submit(&mut input, &mut pane).await.unwrap();
    assert!(notifier.alerts().is_empty());
    assert!(!optimized.bytes.is_empty());
}

#[tokio::test]
async fn test_remote_non_image_is_rejected_before_compression() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/page");
        then.status(200)
            .header("Content-Type", "text/html")
            .body("<html></html>");
    });

    let file = HttpSource::new().fetch(&server.url("/page")).await.unwrap();
    assert_eq!(file.mime, "text/html");

    let mut input = FileInput::new();
    input.select(file);
    let mut pane = PreviewPane::new("image-preview");

    let config = test_config(2 * 1024 * 1024);
    let notifier = RecordingNotifier::default();
    let engine = UploadEngine::new(
        ImageOptimizer::new(config.clone()),
        config,
        notifier.clone(),
    );

    let result = engine.submit(&mut input, &mut pane).await;

    assert!(result.is_none());
    assert_eq!(notifier.alerts(), vec!["File format is not supported"]);
    assert!(input.is_empty());
    assert!(pane.is_empty());
}

#[tokio::test]
async fn test_oversize_output_clears_selection() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("photo.png"), sample_png(128, 128)).unwrap();

    let source = LocalSource::new(dir.path().to_str().unwrap().to_string());
    let file = source.fetch("photo.png").await.unwrap();

    let mut input = FileInput::new();
    input.select(file);
    let mut pane = PreviewPane::new("image-preview");

    // Any real encoding of a 128x128 image is bigger than 50 bytes.
    let config = test_config(50);
    let notifier = RecordingNotifier::default();
    let engine = UploadEngine::new(
        ImageOptimizer::new(config.clone()),
        config,
        notifier.clone(),
    );

    let result = engine.submit(&mut input, &mut pane).await;

    assert!(result.is_none());
    assert_eq!(notifier.alerts().len(), 1);
    assert!(input.is_empty());
    assert!(pane.is_empty());
}

#[tokio::test]
async fn test_transparent_png_keeps_transparency_capable_format() {
    let mut buffer = RgbaImage::from_pixel(48, 48, Rgba([10, 20, 30, 255]));
    buffer.put_pixel(4, 4, Rgba([0, 0, 0, 0]));
    let image = DynamicImage::ImageRgba8(buffer);
    let mut out = std::io::Cursor::new(Vec::new());
    image.write_to(&mut out, image::ImageFormat::Png).unwrap();

    let mut input = FileInput::new();
    input.select(form_prep::SelectedFile {
        name: "logo.png".to_string(),
        mime: "image/png".to_string(),
        bytes: out.into_inner(),
        last_modified: None,
    });
    let mut pane = PreviewPane::new("image-preview");

    let config = test_config(2 * 1024 * 1024);
    let notifier = RecordingNotifier::default();
    let engine = UploadEngine::new(
        ImageOptimizer::new(config.clone()),
        config,
        notifier.clone(),
    );

    let optimized = engine.submit(&mut input, &mut pane).await.unwrap();

    assert_ne!(optimized.kind, ImageKind::Jpeg);
}
