use crate::domain::model::{CompressionOptions, EncodePlan, OptimizedImage, SelectedFile};
use crate::utils::error::Result;
use async_trait::async_trait;
use image::DynamicImage;

/// Where selected-file bytes come from: local disk, an HTTP origin, a mock.
pub trait ImageSource: Send + Sync {
    fn fetch(
        &self,
        location: &str,
    ) -> impl std::future::Future<Output = Result<SelectedFile>> + Send;
}

/// Settings the upload flow reads: size ceiling, accepted types, encoder
/// options and the preview origin.
pub trait OptimizerConfig: Send + Sync {
    fn max_upload_size(&self) -> u64;
    fn supported_types(&self) -> &[String];
    fn compression(&self) -> &CompressionOptions;
    fn preview_base(&self) -> &str;
}

/// The compression steps: decode bytes to a bitmap, plan format and
/// dimensions, re-encode. Each step is a one-shot awaited operation.
#[async_trait]
pub trait ImagePipeline: Send + Sync {
    async fn decode(&self, file: &SelectedFile) -> Result<DynamicImage>;
    async fn plan(&self, image: &DynamicImage, file: &SelectedFile) -> Result<EncodePlan>;
    async fn encode(
        &self,
        image: DynamicImage,
        plan: EncodePlan,
        source_name: &str,
    ) -> Result<OptimizedImage>;
}

/// Blocking user-facing alert surface the engine reports rejections through.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}
