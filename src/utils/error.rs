use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Image processing failed: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Fetch failed: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("No file selected")]
    NoFileSelected,

    #[error("Unsupported image type: {mime}")]
    UnsupportedType { mime: String },

    #[error("Compressed file is {size} bytes, over the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

impl UploadError {
    /// Text surfaced to the user at the alert boundary. Internal detail stays
    /// in the log; the alert says what the user can act on.
    pub fn user_message(&self) -> String {
        match self {
            Self::NoFileSelected => "Please select a file first".to_string(),
            Self::UnsupportedType { .. } => "File format is not supported".to_string(),
            Self::TooLarge { limit, .. } => {
                format!("Maximum file size is {}MB", limit / (1024 * 1024))
            }
            Self::ImageError(_) => "The selected image could not be processed".to_string(),
            Self::FetchError(_) => "The file could not be loaded".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, UploadError>;
