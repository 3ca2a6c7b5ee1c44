pub mod jpeg;
pub mod png;
pub mod webp;

use crate::buffer::PixelBuffer;
use crate::error::ConvertError;
use crate::format::OutputFormat;

use self::jpeg::JpegEncoder;
use self::png::PngEncoder;
use self::webp::WebpEncoder;

pub trait ImageEncoder: Send + Sync {
    fn format(&self) -> OutputFormat;

    /// Encode the whole buffer into memory. `quality` is already validated.
    fn encode(&self, buffer: &PixelBuffer, quality: i32) -> Result<Vec<u8>, ConvertError>;
}

/// Encoded output together with its MIME type.
#[derive(Debug, Clone)]
pub struct Encoded {
    pub format: OutputFormat,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub fn encoder_for(format: OutputFormat) -> &'static dyn ImageEncoder {
    match format {
        OutputFormat::Jpeg => &JpegEncoder,
        OutputFormat::Png => &PngEncoder,
        OutputFormat::Webp => &WebpEncoder,
    }
}

pub fn encode(
    buffer: &PixelBuffer,
    format: OutputFormat,
    quality: i32,
) -> Result<Encoded, ConvertError> {
    let encoder = encoder_for(format);
    let bytes = encoder.encode(buffer, quality)?;

    log::debug!(
        "Encoded {}x{} image as {}: {} bytes",
        buffer.width(),
        buffer.height(),
        encoder.format(),
        bytes.len()
    );

    Ok(Encoded {
        format,
        content_type: format.content_type(),
        bytes,
    })
}
