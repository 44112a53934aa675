//! Texture loader for PNG, JPG, BMP images

use image::DynamicImage;

use super::LoaderError;

/// Decoded texture in RGBA8
#[derive(Clone, Debug)]
pub struct TextureAsset {
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Bytes per row (width * 4 for RGBA)
    pub bytes_per_row: u32,
    /// Whether texture uses sRGB color space
    pub srgb: bool,
}

/// Loader for image textures
pub struct TextureLoader {
    /// Interpret as sRGB
    pub srgb: bool,
    /// Flip rows so the first row is the bottom of the image
    pub flip_y: bool,
}

impl Default for TextureLoader {
    fn default() -> Self {
        Self {
            srgb: true,
            flip_y: false,
        }
    }
}

impl TextureLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a texture from image bytes
    pub fn load(&self, data: &[u8], path: &str) -> Result<TextureAsset, LoaderError> {
        let img = image::load_from_memory(data).map_err(|e| LoaderError::Image {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let img = if self.flip_y { img.flipv() } else { img };
        Ok(self.to_asset(img))
    }

    fn to_asset(&self, img: DynamicImage) -> TextureAsset {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        TextureAsset {
            data: rgba.into_raw(),
            width,
            height,
            bytes_per_row: width * 4,
            srgb: self.srgb,
        }
    }

    /// Create a 1x1 solid color texture, used in place of a texture that
    /// failed to load.
    pub fn solid_color(r: u8, g: u8, b: u8, a: u8) -> TextureAsset {
        TextureAsset {
            data: vec![r, g, b, a],
            width: 1,
            height: 1,
            bytes_per_row: 4,
            srgb: true,
        }
    }
}
