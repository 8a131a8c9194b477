use crate::core::preview::PreviewPane;
use crate::core::{ImagePipeline, Notifier, OptimizerConfig, Result};
use crate::domain::model::{FileInput, OptimizedImage};
use crate::utils::error::UploadError;

/// Drives one submission attempt: validate the selection, compress it, enforce
/// the size ceiling, stage the preview and swap the optimized file into the
/// input. Every failure funnels through a single alert-and-reset boundary.
pub struct UploadEngine<P: ImagePipeline, C: OptimizerConfig, N: Notifier> {
    pipeline: P,
    config: C,
    notifier: N,
}

impl<P: ImagePipeline, C: OptimizerConfig, N: Notifier> UploadEngine<P, C, N> {
    pub fn new(pipeline: P, config: C, notifier: N) -> Self {
        Self {
            pipeline,
            config,
            notifier,
        }
    }

    /// The whole user-visible flow. On rejection the user gets an alert, the
    /// input loses its selection and the pane is emptied so no stale preview
    /// survives the error.
    pub async fn submit(
        &self,
        input: &mut FileInput,
        pane: &mut PreviewPane,
    ) -> Option<OptimizedImage> {
        match self.process(input, pane).await {
            Ok(optimized) => Some(optimized),
            Err(error) => {
                tracing::warn!("Upload rejected: {}", error);
                self.notifier.alert(&error.user_message());
                input.clear();
                pane.clear();
                None
            }
        }
    }

    async fn process(
        &self,
        input: &mut FileInput,
        pane: &mut PreviewPane,
    ) -> Result<OptimizedImage> {
        let file = input.selection().ok_or(UploadError::NoFileSelected)?;

        // Reject unknown types before any decode work happens.
        if !self
            .config
            .supported_types()
            .iter()
            .any(|mime| mime == &file.mime)
        {
            return Err(UploadError::UnsupportedType {
                mime: file.mime.clone(),
            });
        }

        tracing::debug!(
            "Compressing {} ({}, {} bytes)",
            file.name,
            file.mime,
            file.size()
        );

        let bitmap = self.pipeline.decode(file).await?;
        let plan = self.pipeline.plan(&bitmap, file).await?;
        let optimized = self.pipeline.encode(bitmap, plan, &file.name).await?;

        let limit = self.config.max_upload_size();
        if optimized.size() > limit {
            return Err(UploadError::TooLarge {
                size: optimized.size(),
                limit,
            });
        }

        tracing::info!(
            "Optimized {} -> {} ({}x{}, {} bytes)",
            file.name,
            optimized.name,
            optimized.width,
            optimized.height,
            optimized.size()
        );

        pane.show_optimized(&optimized);
        input.replace(optimized.clone().into_selected());

        Ok(optimized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EncodePlan;
    use crate::domain::model::{CompressionOptions, ImageKind, SelectedFile};
    use async_trait::async_trait;
    use chrono::Utc;
    use image::DynamicImage;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    struct MockConfig {
        max_upload_size: u64,
        supported_types: Vec<String>,
        compression: CompressionOptions,
    }

    impl MockConfig {
        fn new(max_upload_size: u64) -> Self {
            Self {
                max_upload_size,
                supported_types: crate::config::DEFAULT_SUPPORTED_TYPES
                    .iter()
                    .map(|mime| mime.to_string())
                    .collect(),
                compression: CompressionOptions::default(),
            }
        }
    }

    impl OptimizerConfig for MockConfig {
        fn max_upload_size(&self) -> u64 {
            self.max_upload_size
        }

        fn supported_types(&self) -> &[String] {
            &self.supported_types
        }

        fn compression(&self) -> &CompressionOptions {
            &self.compression
        }

        fn preview_base(&self) -> &str {
            "http://localhost:8080"
        }
    }

    /// Pipeline that emits a fixed payload and records whether it ran.
    struct MockPipeline {
        output_size: usize,
        decoded: Arc<AtomicBool>,
    }

    impl MockPipeline {
        fn new(output_size: usize) -> Self {
            Self {
                output_size,
                decoded: Arc::new(AtomicBool::new(false)),
            }
        }
    }

    #[async_trait]
    impl ImagePipeline for MockPipeline {
        async fn decode(&self, _file: &SelectedFile) -> crate::utils::error::Result<DynamicImage> {
            self.decoded.store(true, Ordering::SeqCst);
            Ok(DynamicImage::new_rgba8(4, 4))
        }

        async fn plan(
            &self,
            _image: &DynamicImage,
            _file: &SelectedFile,
        ) -> crate::utils::error::Result<EncodePlan> {
            Ok(EncodePlan {
                target: ImageKind::Png,
                width: 4,
                height: 4,
            })
        }

        async fn encode(
            &self,
            _image: DynamicImage,
            plan: EncodePlan,
            source_name: &str,
        ) -> crate::utils::error::Result<crate::domain::model::OptimizedImage> {
            Ok(crate::domain::model::OptimizedImage {
                name: format!("{}_opt.png", source_name.trim_end_matches(".png")),
                kind: plan.target,
                bytes: vec![0; self.output_size],
                width: plan.width,
                height: plan.height,
                last_modified: Utc::now(),
            })
        }
    }

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

    fn selected(name: &str, mime: &str) -> SelectedFile {
        SelectedFile {
            name: name.to_string(),
            mime: mime.to_string(),
            bytes: vec![1, 2, 3],
            last_modified: None,
        }
    }

    #[tokio::test]
    async fn test_submit_without_selection_alerts_and_resets() {
        let notifier = RecordingNotifier::default();
        let engine = UploadEngine::new(MockPipeline::new(16), MockConfig::new(1024), notifier.clone());
        let mut input = FileInput::new();
        let mut pane = PreviewPane::new("image-preview");

        let result = engine.submit(&mut input, &mut pane).await;

        assert!(result.is_none());
        assert_eq!(notifier.alerts(), vec!["Please select a file first"]);
        assert!(input.is_empty());
        assert!(pane.is_empty());
    }

    #[tokio::test]
    async fn test_submit_rejects_unsupported_type_without_decoding() {
        let pipeline = MockPipeline::new(16);
        let decoded = pipeline.decoded.clone();
        let notifier = RecordingNotifier::default();
        let engine = UploadEngine::new(pipeline, MockConfig::new(1024), notifier.clone());

        let mut input = FileInput::new();
        input.select(selected("notes.txt", "text/plain"));
        let mut pane = PreviewPane::new("image-preview");

        let result = engine.submit(&mut input, &mut pane).await;

        assert!(result.is_none());
        assert!(!decoded.load(Ordering::SeqCst));
        assert_eq!(notifier.alerts(), vec!["File format is not supported"]);
        assert!(input.is_empty());
    }

    #[tokio::test]
    async fn test_submit_rejects_oversize_output_and_clears_input() {
        let notifier = RecordingNotifier::default();
        // Pipeline emits 2048 bytes against a 1024 byte ceiling.
        let engine =
            UploadEngine::new(MockPipeline::new(2048), MockConfig::new(1024), notifier.clone());

        let mut input = FileInput::new();
        input.select(selected("photo.png", "image/png"));
        let mut pane = PreviewPane::new("image-preview");

        let result = engine.submit(&mut input, &mut pane).await;

        assert!(result.is_none());
        assert_eq!(notifier.alerts(), vec!["Maximum file size is 0MB"]);
        assert!(input.is_empty());
        assert!(pane.is_empty());
    }

    #[tokio::test]
    async fn test_submit_success_swaps_input_and_stages_preview() {
        let notifier = RecordingNotifier::default();
        let engine = UploadEngine::new(MockPipeline::new(64), MockConfig::new(1024), notifier.clone());

        let mut input = FileInput::new();
        input.select(selected("photo.png", "image/png"));
        let mut pane = PreviewPane::new("image-preview");

        let optimized = engine.submit(&mut input, &mut pane).await.unwrap();

        assert_eq!(optimized.name, "photo_opt.png");
        assert!(notifier.alerts().is_empty());
        assert_eq!(input.selection().unwrap().name, "photo_opt.png");
        assert_eq!(input.selection().unwrap().mime, "image/png");
        assert!(!pane.is_empty());
    }

    #[tokio::test]
    async fn test_error_after_success_leaves_no_stale_preview() {
        let notifier = RecordingNotifier::default();
        let engine = UploadEngine::new(MockPipeline::new(64), MockConfig::new(1024), notifier.clone());

        let mut input = FileInput::new();
        input.select(selected("photo.png", "image/png"));
        let mut pane = PreviewPane::new("image-preview");

        engine.submit(&mut input, &mut pane).await.unwrap();
        assert!(!pane.is_empty());

        // Next attempt with nothing selected: the old preview must not linger.
        input.clear();
        let result = engine.submit(&mut input, &mut pane).await;

        assert!(result.is_none());
        assert!(pane.is_empty());
    }
}
