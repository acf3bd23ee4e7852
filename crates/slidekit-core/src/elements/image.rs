//! Image element payload.

use super::SerializableColor;
use serde::{Deserialize, Serialize};

/// Image format for inline image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        None
    }
}

/// Where the image pixels come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ImageSource {
    /// External resource, resolved by the host.
    Url { url: String },
    /// Inline base64-encoded image data.
    Data {
        format: ImageFormat,
        #[serde(rename = "base64")]
        data_base64: String,
    },
}

/// How the image is fitted into the element frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    /// Scale to fit entirely inside, letterboxed.
    #[default]
    Contain,
    /// Scale to fill, cropping the overflow.
    Cover,
    /// Stretch to the frame, ignoring aspect ratio.
    Fill,
}

/// Load status of the image resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AssetState {
    #[default]
    Pending,
    Loaded { width: u32, height: u32 },
    Failed,
}

/// Content and style of an image box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageContent {
    pub source: Option<ImageSource>,
    pub fit: ImageFit,
    pub border_color: Option<SerializableColor>,
    pub border_width: f64,
    pub corner_radius: f64,
    pub alt: String,
    pub state: AssetState,
}

impl Default for ImageContent {
    fn default() -> Self {
        Self {
            source: None,
            fit: ImageFit::Contain,
            border_color: None,
            border_width: 0.0,
            corner_radius: 0.0,
            alt: String::new(),
            state: AssetState::Pending,
        }
    }
}

impl ImageContent {
    pub fn new(source: Option<ImageSource>) -> Self {
        Self {
            source,
            ..Default::default()
        }
    }

    /// Intrinsic pixel size, once known.
    pub fn intrinsic_size(&self) -> Option<(u32, u32)> {
        match self.state {
            AssetState::Loaded { width, height } if width > 0 && height > 0 => Some((width, height)),
            _ => None,
        }
    }

    /// Whether the renderer must fall back to the placeholder.
    pub fn needs_placeholder(&self) -> bool {
        self.source.is_none() || self.state == AssetState::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_bytes() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D]),
            Some(ImageFormat::Png)
        );
        assert_eq!(ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_magic_bytes(b"RIFF\0\0\0\0WEBPVP8 "), Some(ImageFormat::WebP));
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF8"), None);
    }

    #[test]
    fn test_placeholder_rules() {
        let mut image = ImageContent::new(None);
        assert!(image.needs_placeholder());
        image.source = Some(ImageSource::Url {
            url: "https://example.com/a.png".into(),
        });
        assert!(!image.needs_placeholder());
        image.state = AssetState::Failed;
        assert!(image.needs_placeholder());
    }
}
