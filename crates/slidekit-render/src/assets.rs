//! Image asset decoding.
//!
//! Hosts call [`image_dimensions`] (or [`load_dimensions`]) off the edit path
//! and feed the result back through `Editor::complete_asset_load`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ImageReader, RgbaImage};
use slidekit_core::editor::AssetLoad;
use slidekit_core::elements::{ImageFormat, ImageSource};
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Could not read image: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Remote image must be fetched by the host: {0}")]
    Remote(String),
}

/// Raw bytes of an inline image.
pub fn source_bytes(source: &ImageSource) -> Result<Vec<u8>, AssetError> {
    match source {
        ImageSource::Data { data_base64, .. } => Ok(STANDARD.decode(data_base64.trim())?),
        ImageSource::Url { url } => Err(AssetError::Remote(url.clone())),
    }
}

/// Encode raw image bytes as an inline source, sniffing the format.
pub fn inline_source(bytes: &[u8]) -> Option<ImageSource> {
    let format = ImageFormat::from_magic_bytes(bytes)?;
    Some(ImageSource::Data {
        format,
        data_base64: STANDARD.encode(bytes),
    })
}

/// Pixel dimensions without decoding the whole image.
pub fn image_dimensions(source: &ImageSource) -> Result<(u32, u32), AssetError> {
    let bytes = source_bytes(source)?;
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    Ok(reader.into_dimensions()?)
}

/// [`image_dimensions`] mapped to an editor asset completion.
pub fn load_dimensions(source: &ImageSource) -> AssetLoad {
    match image_dimensions(source) {
        Ok((width, height)) => AssetLoad::Loaded { width, height },
        Err(err) => {
            log::warn!("Reading image size failed: {err}");
            AssetLoad::Failed
        }
    }
}

/// Fully decode to RGBA8 for painting.
pub fn decode_rgba(source: &ImageSource) -> Result<RgbaImage, AssetError> {
    let bytes = source_bytes(source)?;
    Ok(image::load_from_memory(&bytes)?.to_rgba8())
}

#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_png_dimensions() {
        let source = inline_source(&png_bytes(3, 2)).unwrap();
        assert!(matches!(source, ImageSource::Data { format: ImageFormat::Png, .. }));
        assert_eq!(image_dimensions(&source).unwrap(), (3, 2));
        assert_eq!(load_dimensions(&source), AssetLoad::Loaded { width: 3, height: 2 });
        assert_eq!(decode_rgba(&source).unwrap().dimensions(), (3, 2));
    }

    #[test]
    fn test_corrupt_data_fails() {
        let source = ImageSource::Data {
            format: ImageFormat::Png,
            data_base64: STANDARD.encode(b"not an image"),
        };
        assert!(image_dimensions(&source).is_err());
        assert_eq!(load_dimensions(&source), AssetLoad::Failed);
    }

    #[test]
    fn test_bad_base64_and_remote() {
        let bad = ImageSource::Data {
            format: ImageFormat::Png,
            data_base64: "%%%".into(),
        };
        assert!(matches!(image_dimensions(&bad), Err(AssetError::Base64(_))));
        let remote = ImageSource::Url {
            url: "https://example.com/x.png".into(),
        };
        assert!(matches!(image_dimensions(&remote), Err(AssetError::Remote(_))));
    }
}
