pub mod engine;
pub mod feedback;
pub mod optimizer;
pub mod preview;

pub use crate::domain::model::{EncodePlan, FileInput, OptimizedImage, SelectedFile};
pub use crate::domain::ports::{ImagePipeline, ImageSource, Notifier, OptimizerConfig};
pub use crate::utils::error::Result;
