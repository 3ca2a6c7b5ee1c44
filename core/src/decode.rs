use std::io::Read;
use std::path::Path;

use image::ImageFormat;

use crate::buffer::PixelBuffer;
use crate::error::ConvertError;

/// A decoded input image and the format it was detected as.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub buffer: PixelBuffer,
    pub source_format: &'static str,
}

/// Read the whole stream and decode it, detecting the format from its content.
///
/// Animated inputs yield their first frame.
pub fn decode<R: Read>(mut reader: R) -> Result<Decoded, ConvertError> {
    let mut data = Vec::new();
    reader
        .read_to_end(&mut data)
        .map_err(|e| ConvertError::Decode(format!("failed to read input: {e}")))?;

    decode_bytes(&data)
}

pub fn decode_bytes(data: &[u8]) -> Result<Decoded, ConvertError> {
    if data.is_empty() {
        return Err(ConvertError::Decode("empty input".into()));
    }

    let format = image::guess_format(data)
        .map_err(|e| ConvertError::Decode(format!("unrecognized image format: {e}")))?;

    let img = image::load_from_memory_with_format(data, format)
        .map_err(|e| ConvertError::Decode(e.to_string()))?;

    log::debug!(
        "Decoded {} image: {}x{} pixels ({:?})",
        format_name(format),
        img.width(),
        img.height(),
        img.color()
    );

    Ok(Decoded {
        buffer: PixelBuffer::from(img),
        source_format: format_name(format),
    })
}

/// Input extensions with a compiled-in decoder.
///
/// AVIF is left out: `reading_enabled()` reports it as readable when only the
/// encoder feature is on.
const INPUT_EXTENSIONS: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("gif", ImageFormat::Gif),
    ("bmp", ImageFormat::Bmp),
    ("webp", ImageFormat::WebP),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
];

/// Whether a file looks like an input we can decode, judged by its extension.
pub fn is_supported_path(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    INPUT_EXTENSIONS
        .iter()
        .any(|(known, format)| known.eq_ignore_ascii_case(ext) && format.reading_enabled())
}

fn format_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Png => "png",
        ImageFormat::Gif => "gif",
        ImageFormat::Bmp => "bmp",
        ImageFormat::WebP => "webp",
        ImageFormat::Tiff => "tiff",
        other => other.extensions_str().first().copied().unwrap_or("unknown"),
    }
}
