// Adapters layer: concrete implementations for external systems the engine
// talks to through ports (HTTP byte source, console alert surface).

use crate::domain::model::SelectedFile;
use crate::domain::ports::{ImageSource, Notifier};
use crate::utils::error::{Result, UploadError};
use reqwest::Client;
use url::Url;

/// HTTP-backed image source. The MIME type comes from the response
/// Content-Type, the file name from the last URL path segment.
#[derive(Debug, Clone, Default)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl ImageSource for HttpSource {
    async fn fetch(&self, location: &str) -> Result<SelectedFile> {
        tracing::debug!("Fetching image from: {}", location);
        let response = self.client.get(location).send().await?;

        if !response.status().is_success() {
            return Err(UploadError::ProcessingError {
                message: format!("Image request failed with status: {}", response.status()),
            });
        }

        let mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let name = Url::parse(location)?
            .path_segments()
            .and_then(|segments| segments.last().map(str::to_string))
            .filter(|segment| !segment.is_empty())
            .unwrap_or_else(|| "download".to_string());

        let bytes = response.bytes().await?.to_vec();

        Ok(SelectedFile {
            name,
            mime,
            bytes,
            last_modified: None,
        })
    }
}

/// Alert surface for terminal hosts: the blocking browser alert becomes a
/// stderr line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        eprintln!("⚠️  {}", message);
    }
}
