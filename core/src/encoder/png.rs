use std::io::Cursor;

use image::ImageFormat;

use crate::buffer::PixelBuffer;
use crate::error::ConvertError;
use crate::format::OutputFormat;
use crate::encoder::ImageEncoder;

pub struct PngEncoder;

impl ImageEncoder for PngEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Png
    }

    /// Always lossless; quality is ignored.
    fn encode(&self, buffer: &PixelBuffer, _quality: i32) -> Result<Vec<u8>, ConvertError> {
        let mut output = Vec::new();
        let mut cursor = Cursor::new(&mut output);

        buffer
            .as_rgba()
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|e| ConvertError::Encode(format!("failed to encode PNG: {e}")))?;

        Ok(output)
    }
}
