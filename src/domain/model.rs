use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Image encodings the form accepts and the optimizer can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
    Gif,
}

impl ImageKind {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            "image/gif" => Some(Self::Gif),
            _ => None,
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::Webp),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    pub const fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Gif => "image/gif",
        }
    }

    /// File extension, taken from the MIME subtype like the generated
    /// `_opt.<ext>` names expect.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Gif => "gif",
        }
    }

    pub const fn can_hold_alpha(self) -> bool {
        matches!(self, Self::Png | Self::Webp | Self::Gif)
    }
}

/// A file the user picked in a file input: name, declared MIME type and raw bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl SelectedFile {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn kind(&self) -> Option<ImageKind> {
        ImageKind::from_mime(&self.mime)
    }
}

/// Output format and dimensions chosen for one compression run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodePlan {
    pub target: ImageKind,
    pub width: u32,
    pub height: u32,
}

/// Result of a compression run, ready to be swapped into the file input.
#[derive(Debug, Clone)]
pub struct OptimizedImage {
    pub name: String,
    pub kind: ImageKind,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub last_modified: DateTime<Utc>,
}

impl OptimizedImage {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn into_selected(self) -> SelectedFile {
        SelectedFile {
            name: self.name,
            mime: self.kind.mime().to_string(),
            bytes: self.bytes,
            last_modified: Some(self.last_modified),
        }
    }
}

/// Single-selection file input model. Holds at most one file; selecting or
/// replacing discards the previous one.
#[derive(Debug, Clone, Default)]
pub struct FileInput {
    selection: Option<SelectedFile>,
}

impl FileInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, file: SelectedFile) {
        self.selection = Some(file);
    }

    /// Swap the selection for the optimized file, like rebuilding the input's
    /// file list after compression.
    pub fn replace(&mut self, file: SelectedFile) {
        self.selection = Some(file);
    }

    pub fn clear(&mut self) {
        self.selection = None;
    }

    pub fn selection(&self) -> Option<&SelectedFile> {
        self.selection.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.selection.is_none()
    }
}

/// Per-format encoder settings. Defaults follow the values the form has always
/// shipped with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionOptions {
    pub jpeg_quality: u8,
    pub webp_quality: f32,
    pub webp_lossless: bool,
    pub gif_speed: i32,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: 80,
            webp_quality: 85.0,
            webp_lossless: false,
            gif_speed: 10,
        }
    }
}
