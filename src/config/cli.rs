use crate::domain::model::{ImageKind, SelectedFile};
use crate::domain::ports::ImageSource;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

/// Filesystem-backed image source. The MIME type comes from the file
/// extension, like the type a browser reports for a picked file.
#[derive(Debug, Clone)]
pub struct LocalSource {
    base_path: String,
}

impl LocalSource {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl ImageSource for LocalSource {
    async fn fetch(&self, location: &str) -> Result<SelectedFile> {
        let full_path = Path::new(&self.base_path).join(location);
        let bytes = fs::read(&full_path)?;

        let name = full_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        let mime = full_path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ImageKind::from_extension)
            .map(|kind| kind.mime().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let last_modified = fs::metadata(&full_path)
            .ok()
            .and_then(|meta| meta.modified().ok())
            .map(DateTime::<Utc>::from);

        Ok(SelectedFile {
            name,
            mime,
            bytes,
            last_modified,
        })
    }
}
