use crate::core::{EncodePlan, ImagePipeline, OptimizerConfig, Result, SelectedFile};
use crate::domain::model::{CompressionOptions, ImageKind, OptimizedImage};
use crate::utils::error::UploadError;
use async_trait::async_trait;
use chrono::Utc;
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, Frame, GenericImageView};
use regex::Regex;
use std::sync::OnceLock;

/// Sources larger than this on their longest edge get the bigger target, so
/// 4K-and-up photos keep some headroom.
const LARGE_SOURCE_DIMENSION: u32 = 3840;
const LARGE_TARGET_DIMENSION: u32 = 1600;
const TARGET_DIMENSION: u32 = 1200;

/// Edge length of the thumbnail sampled for the alpha scan.
const TRANSPARENCY_SAMPLE: u32 = 100;

/// Compression pipeline: decode, pick format and dimensions, re-encode.
/// The CPU-bound steps run on the blocking pool.
pub struct ImageOptimizer<C: OptimizerConfig> {
    config: C,
}

impl<C: OptimizerConfig> ImageOptimizer<C> {
    pub fn new(config: C) -> Self {
        Self { config }
    }
}

#[async_trait]
impl<C: OptimizerConfig> ImagePipeline for ImageOptimizer<C> {
    async fn decode(&self, file: &SelectedFile) -> Result<DynamicImage> {
        tracing::debug!("Decoding {} ({} bytes)", file.name, file.bytes.len());

        let bytes = file.bytes.clone();
        let image = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
            .await
            .map_err(|e| UploadError::ProcessingError {
                message: format!("Decode task failed: {}", e),
            })??;

        Ok(image)
    }

    async fn plan(&self, image: &DynamicImage, file: &SelectedFile) -> Result<EncodePlan> {
        let source_kind = file.kind().ok_or_else(|| UploadError::UnsupportedType {
            mime: file.mime.clone(),
        })?;

        // GIFs stay GIFs; everything else picks the best encoding the build
        // supports, keeping transparency out of JPEG.
        let target = if source_kind == ImageKind::Gif {
            ImageKind::Gif
        } else if has_transparency(image) {
            if webp_encoder_available() {
                ImageKind::Webp
            } else {
                ImageKind::Png
            }
        } else if webp_encoder_available() {
            ImageKind::Webp
        } else {
            ImageKind::Jpeg
        };

        let (width, height) = scaled_dimensions(image.dimensions());
        tracing::debug!(
            "Planned {} -> {} at {}x{}",
            file.mime,
            target.mime(),
            width,
            height
        );

        Ok(EncodePlan {
            target,
            width,
            height,
        })
    }

    async fn encode(
        &self,
        image: DynamicImage,
        plan: EncodePlan,
        source_name: &str,
    ) -> Result<OptimizedImage> {
        let name = optimized_file_name(source_name, plan.target);
        let options = self.config.compression().clone();

        let bytes = tokio::task::spawn_blocking(move || encode_planned(image, plan, &options))
            .await
            .map_err(|e| UploadError::ProcessingError {
                message: format!("Encode task failed: {}", e),
            })??;

        Ok(OptimizedImage {
            name,
            kind: plan.target,
            bytes,
            width: plan.width,
            height: plan.height,
            last_modified: Utc::now(),
        })
    }
}

/// Scale both edges down to the target for the source size, never up.
fn scaled_dimensions((width, height): (u32, u32)) -> (u32, u32) {
    let max_dimension = width.max(height);
    let target = if max_dimension > LARGE_SOURCE_DIMENSION {
        LARGE_TARGET_DIMENSION
    } else {
        TARGET_DIMENSION
    };

    let scale = (f64::from(target) / f64::from(max_dimension)).min(1.0);
    (
        (f64::from(width) * scale).round() as u32,
        (f64::from(height) * scale).round() as u32,
    )
}

/// Any translucent pixel in a downsampled copy counts. Images without an
/// alpha channel skip the scan entirely.
fn has_transparency(image: &DynamicImage) -> bool {
    if !image.color().has_alpha() {
        return false;
    }

    let sample = image.thumbnail(TRANSPARENCY_SAMPLE, TRANSPARENCY_SAMPLE);
    sample.to_rgba8().pixels().any(|px| px.0[3] < u8::MAX)
}

/// `photo.name.jpg` -> `photo.name_opt.webp`
fn optimized_file_name(source_name: &str, target: ImageKind) -> String {
    static EXTENSION: OnceLock<Regex> = OnceLock::new();
    let re = EXTENSION.get_or_init(|| Regex::new(r"\.[^/.]+$").expect("static pattern"));
    format!("{}_opt.{}", re.replace(source_name, ""), target.extension())
}

fn encode_planned(
    image: DynamicImage,
    plan: EncodePlan,
    options: &CompressionOptions,
) -> Result<Vec<u8>> {
    let resized = if image.dimensions() == (plan.width, plan.height) {
        image
    } else {
        image.resize_exact(plan.width, plan.height, FilterType::Lanczos3)
    };

    let mut out = Vec::new();
    match plan.target {
        ImageKind::Jpeg => {
            // JPEG carries no alpha channel.
            let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut out, options.jpeg_quality);
            rgb.write_with_encoder(encoder)?;
        }
        ImageKind::Png => {
            let encoder =
                PngEncoder::new_with_quality(&mut out, CompressionType::Default, PngFilterType::Adaptive);
            resized.write_with_encoder(encoder)?;
        }
        ImageKind::Gif => {
            let mut encoder = GifEncoder::new_with_speed(&mut out, options.gif_speed);
            encoder.encode_frame(Frame::new(resized.to_rgba8()))?;
        }
        ImageKind::Webp => {
            out = encode_webp(&resized, options)?;
        }
    }

    Ok(out)
}

#[cfg(feature = "webp")]
fn encode_webp(image: &DynamicImage, options: &CompressionOptions) -> Result<Vec<u8>> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let encoder = webp::Encoder::from_rgba(rgba.as_raw(), width, height);

    let encoded = if options.webp_lossless {
        encoder.encode_lossless()
    } else {
        encoder.encode(options.webp_quality)
    };

    Ok(encoded.to_vec())
}

#[cfg(not(feature = "webp"))]
fn encode_webp(_image: &DynamicImage, _options: &CompressionOptions) -> Result<Vec<u8>> {
    Err(UploadError::ProcessingError {
        message: "WebP encoder support is not compiled in".to_string(),
    })
}

/// Whether a lossy WebP encoder is present in this build. Probed once and
/// cached, since the answer never changes within a process.
pub fn webp_encoder_available() -> bool {
    #[cfg(feature = "webp")]
    {
        static PROBE: OnceLock<bool> = OnceLock::new();
        *PROBE.get_or_init(|| {
            let pixel = [0u8, 0, 0, 255];
            !webp::Encoder::from_rgba(&pixel, 1, 1).encode(50.0).is_empty()
        })
    }
    #[cfg(not(feature = "webp"))]
    {
        false
    }
}
