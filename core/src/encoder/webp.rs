use crate::buffer::PixelBuffer;
use crate::error::ConvertError;
use crate::format::OutputFormat;
use crate::encoder::ImageEncoder;

pub struct WebpEncoder;

impl ImageEncoder for WebpEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Webp
    }

    /// Lossy mode only; quality maps directly onto libwebp's 0-100 scale.
    fn encode(&self, buffer: &PixelBuffer, quality: i32) -> Result<Vec<u8>, ConvertError> {
        let rgba = buffer.as_rgba();
        let (width, height) = rgba.dimensions();

        let encoder = webp::Encoder::from_rgba(rgba.as_raw(), width, height);
        let encoded = encoder
            .encode_simple(false, quality as f32)
            .map_err(|e| ConvertError::Encode(format!("failed to encode WebP: {e:?}")))?;

        Ok(encoded.to_vec())
    }
}
