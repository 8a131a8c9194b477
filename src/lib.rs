pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{ConsoleNotifier, HttpSource};
pub use crate::config::cli::LocalSource;
pub use crate::core::engine::UploadEngine;
pub use crate::core::feedback::ErrorFilter;
pub use crate::core::optimizer::ImageOptimizer;
pub use crate::core::preview::{preview_url, Lightbox, ModalState, PreviewPane};
pub use crate::domain::form::{ErrorResponse, FormDocument, FormInput, InputKind};
pub use crate::domain::model::{
    CompressionOptions, FileInput, ImageKind, OptimizedImage, SelectedFile,
};
pub use crate::utils::error::{Result, UploadError};
