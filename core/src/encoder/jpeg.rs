use std::io::Cursor;

use image::ExtendedColorType;

use crate::buffer::PixelBuffer;
use crate::error::ConvertError;
use crate::format::OutputFormat;
use crate::encoder::ImageEncoder;

pub struct JpegEncoder;

impl ImageEncoder for JpegEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Jpeg
    }

    fn encode(&self, buffer: &PixelBuffer, quality: i32) -> Result<Vec<u8>, ConvertError> {
        let quality = u8::try_from(quality).map_err(|_| ConvertError::InvalidQuality(quality))?;

        // JPEG has no alpha channel
        let rgb = buffer.to_dynamic().into_rgb8();
        let (width, height) = rgb.dimensions();

        let mut output = Vec::new();
        let mut cursor = Cursor::new(&mut output);
        let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality);

        encoder
            .encode(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
            .map_err(|e| ConvertError::Encode(format!("failed to encode JPEG: {e}")))?;

        Ok(output)
    }
}
