use crate::domain::model::OptimizedImage;
use crate::utils::error::{Result, UploadError};
use url::Url;

/// Classes the surrounding stylesheet expects on every preview image.
pub const PREVIEW_IMG_CLASSES: [&str; 5] =
    ["img-fluid", "mt-5", "h-lg-250px", "h-md-150px", "cursor-zoom"];

pub const PREVIEW_ALT: &str = "Image preview";

/// What the preview image points at: a server-stored file, or bytes held in
/// memory for a freshly optimized selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageContent {
    Remote(Url),
    Inline { mime: String, bytes: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub content: ImageContent,
    pub alt: String,
    pub classes: Vec<&'static str>,
}

impl PreviewImage {
    fn new(content: ImageContent) -> Self {
        Self {
            content,
            alt: PREVIEW_ALT.to_string(),
            classes: PREVIEW_IMG_CLASSES.to_vec(),
        }
    }
}

/// The modal collaborator a preview zooms into on click.
pub trait Lightbox {
    fn display(&mut self, image: &PreviewImage);
}

/// Minimal modal state for hosts without a real modal integration, and for
/// tests.
#[derive(Debug, Default)]
pub struct ModalState {
    visible: bool,
    image: Option<PreviewImage>,
}

impl ModalState {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn image(&self) -> Option<&PreviewImage> {
        self.image.as_ref()
    }
}

impl Lightbox for ModalState {
    fn display(&mut self, image: &PreviewImage) {
        self.image = Some(image.clone());
        self.visible = true;
    }
}

/// The single container element previews render into. Showing a new preview
/// replaces whatever the container held before.
#[derive(Debug, Default)]
pub struct PreviewPane {
    id: String,
    content: Option<PreviewImage>,
}

impl PreviewPane {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Stage a preview of a server-stored image. An empty file name is a
    /// no-op, matching a form field that has nothing stored yet.
    pub fn show_stored(&mut self, base: &str, path: &str, file: &str) -> Result<()> {
        if file.is_empty() {
            return Ok(());
        }

        let url = preview_url(base, path, file)?;
        self.content = Some(PreviewImage::new(ImageContent::Remote(url)));
        Ok(())
    }

    /// Stage a preview of freshly optimized bytes, the object-URL equivalent.
    pub fn show_optimized(&mut self, image: &OptimizedImage) {
        self.content = Some(PreviewImage::new(ImageContent::Inline {
            mime: image.kind.mime().to_string(),
            bytes: image.bytes.clone(),
        }));
    }

    pub fn clear(&mut self) {
        self.content = None;
    }

    pub fn content(&self) -> Option<&PreviewImage> {
        self.content.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none()
    }

    /// Click-to-zoom: hand the current preview to the modal.
    pub fn zoom(&self, lightbox: &mut impl Lightbox) {
        if let Some(image) = &self.content {
            lightbox.display(image);
        }
    }
}

/// Build `{origin}/preview/{path}/{file}`. Path and file land as single
/// URL-encoded segments, so slashes and spaces inside them are escaped.
pub fn preview_url(base: &str, path: &str, file: &str) -> Result<Url> {
    let base = Url::parse(base)?;
    let origin = base.origin().ascii_serialization();

    let mut url = Url::parse(&origin)?;
    url.path_segments_mut()
        .map_err(|_| UploadError::ProcessingError {
            message: format!("Preview base cannot carry a path: {}", origin),
        })?
        .push("preview")
        .push(path)
        .push(file);

    Ok(url)
}
