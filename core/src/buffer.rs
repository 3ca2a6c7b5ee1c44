use image::{DynamicImage, Rgba, RgbaImage};

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Decoded RGBA8 raster.
///
/// Transforms read from a borrowed buffer and return a new one; nothing
/// mutates a buffer after it has been handed out.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    /// A canvas of the given size with every pixel set to `fill`.
    pub fn filled(width: u32, height: u32, fill: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, fill),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Panics if `(x, y)` is outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.image
    }

    pub fn to_dynamic(&self) -> DynamicImage {
        DynamicImage::ImageRgba8(self.image.clone())
    }

    pub fn into_rgba(self) -> RgbaImage {
        self.image
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(image: RgbaImage) -> Self {
        Self { image }
    }
}

impl From<DynamicImage> for PixelBuffer {
    fn from(image: DynamicImage) -> Self {
        Self {
            image: image.into_rgba8(),
        }
    }
}
