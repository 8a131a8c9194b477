pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::CompressionOptions;
#[cfg(feature = "cli")]
use crate::domain::ports::OptimizerConfig;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{
    self, validate_mime_types, validate_path, validate_positive_number, validate_range,
    validate_url,
};
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

/// Post-compression ceiling: 2 MiB.
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 2 * 1024 * 1024;

pub const DEFAULT_SUPPORTED_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/webp", "image/gif"];

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, clap::Parser)]
#[command(name = "form-prep")]
#[command(about = "Prepare a form image attachment: compress, preview, enforce limits")]
pub struct CliConfig {
    /// Image to prepare: a local path or an http(s) URL
    pub input: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Origin the `/preview/{path}/{file}` URLs are built against
    #[arg(long, default_value = "http://localhost:8080")]
    pub preview_base: String,

    /// Path segment of the preview URL printed for the optimized file
    #[arg(long, default_value = "uploads")]
    pub preview_path: String,

    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_SIZE)]
    pub max_upload_size: u64,

    #[arg(
        long,
        value_delimiter = ',',
        default_value = "image/jpeg,image/png,image/webp,image/gif"
    )]
    pub supported_types: Vec<String>,

    /// Optional TOML config file; values it sets override the flag defaults
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log process stats around compression")]
    pub monitor: bool,

    #[arg(skip)]
    #[serde(default)]
    pub compression: CompressionOptions,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Fold TOML settings in under the current values. Only fields the file
    /// actually sets are taken.
    pub fn merge_toml(&mut self, file: &toml_config::TomlConfig) {
        if let Some(limits) = &file.limits {
            if let Some(max) = limits.max_upload_size {
                self.max_upload_size = max;
            }
            if let Some(types) = &limits.supported_types {
                self.supported_types = types.clone();
            }
        }

        if let Some(compression) = &file.compression {
            self.compression = compression.clone();
        }

        if let Some(preview) = &file.preview {
            if let Some(base) = &preview.base_url {
                self.preview_base = base.clone();
            }
            if let Some(path) = &preview.path {
                self.preview_path = path.clone();
            }
        }
    }
}

#[cfg(feature = "cli")]
impl OptimizerConfig for CliConfig {
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
        &self.preview_base
    }
}

#[cfg(feature = "cli")]
impl validation::Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("preview_base", &self.preview_base)?;
        validate_path("output_path", &self.output_path)?;
        validate_positive_number("max_upload_size", self.max_upload_size, 1)?;
        validate_mime_types("supported_types", &self.supported_types)?;
        validate_range(
            "compression.jpeg_quality",
            self.compression.jpeg_quality,
            1,
            100,
        )?;
        validate_range(
            "compression.webp_quality",
            self.compression.webp_quality,
            0.0,
            100.0,
        )?;
        Ok(())
    }
}
