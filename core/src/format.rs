use std::fmt;
use std::str::FromStr;

use crate::error::ConvertError;

pub const DEFAULT_QUALITY: i32 = 80;
pub const DEFAULT_INTENSITY: i32 = 10;

/// Quality used by the operations whose output is always JPEG.
pub const FIXED_JPEG_QUALITY: i32 = 90;

const QUALITY_RANGE: std::ops::RangeInclusive<i32> = 1..=100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Jpeg,
    Png,
    Webp,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::Webp => "image/webp",
        }
    }

    /// Lossy formats take a quality setting; PNG ignores it.
    pub fn uses_quality(&self) -> bool {
        matches!(self, OutputFormat::Jpeg | OutputFormat::Webp)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jpeg => write!(f, "jpeg"),
            Self::Png => write!(f, "png"),
            Self::Webp => write!(f, "webp"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConvertError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::Webp),
            _ => Err(ConvertError::UnsupportedFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    pub format: OutputFormat,
    /// Encoder quality 1-100 (ignored for PNG)
    pub quality: i32,
}

impl ConvertOptions {
    pub fn new(format: OutputFormat, quality: i32) -> Self {
        Self { format, quality }
    }

    /// Parse a raw format name and quality, checking the format first.
    pub fn parse(format: &str, quality: i32) -> Result<Self, ConvertError> {
        let options = Self::new(format.parse()?, quality);
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.format.uses_quality() && !QUALITY_RANGE.contains(&self.quality) {
            return Err(ConvertError::InvalidQuality(self.quality));
        }
        Ok(())
    }
}

impl From<OutputFormat> for ConvertOptions {
    fn from(format: OutputFormat) -> Self {
        Self::new(format, DEFAULT_QUALITY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterName {
    Blur,
    Grayscale,
}

impl fmt::Display for FilterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blur => write!(f, "blur"),
            Self::Grayscale => write!(f, "grayscale"),
        }
    }
}

impl FromStr for FilterName {
    type Err = ConvertError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "blur" => Ok(Self::Blur),
            "grayscale" => Ok(Self::Grayscale),
            _ => Err(ConvertError::UnknownFilter(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSettings {
    pub name: FilterName,
    /// Blur sigma, or contrast percentage applied after desaturation
    pub intensity: i32,
}

impl FilterSettings {
    pub fn new(name: FilterName, intensity: i32) -> Self {
        Self { name, intensity }
    }

    pub fn parse(name: &str, intensity: i32) -> Result<Self, ConvertError> {
        Ok(Self::new(name.parse()?, intensity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_output_formats_case_insensitively() {
        assert_eq!("JPEG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!("png".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert_eq!(" WebP ".parse::<OutputFormat>().unwrap(), OutputFormat::Webp);
    }

    #[test]
    fn rejects_formats_outside_the_closed_set() {
        for name in ["gif", "jpg", "bmp", ""] {
            assert!(matches!(
                name.parse::<OutputFormat>(),
                Err(ConvertError::UnsupportedFormat(_))
            ));
        }
    }

    #[test]
    fn quality_bounds_apply_to_lossy_formats() {
        for format in [OutputFormat::Jpeg, OutputFormat::Webp] {
            assert!(matches!(
                ConvertOptions::new(format, 0).validate(),
                Err(ConvertError::InvalidQuality(0))
            ));
            assert!(matches!(
                ConvertOptions::new(format, 101).validate(),
                Err(ConvertError::InvalidQuality(101))
            ));
            assert!(ConvertOptions::new(format, 1).validate().is_ok());
            assert!(ConvertOptions::new(format, 100).validate().is_ok());
        }
    }

    #[test]
    fn png_ignores_quality() {
        for quality in [-5, 0, 101, 1000] {
            assert!(ConvertOptions::new(OutputFormat::Png, quality).validate().is_ok());
        }
    }

    #[test]
    fn format_is_checked_before_quality() {
        assert!(matches!(
            ConvertOptions::parse("tiff", 0),
            Err(ConvertError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            ConvertOptions::parse("jpeg", 0),
            Err(ConvertError::InvalidQuality(0))
        ));
    }

    #[test]
    fn unknown_filter_is_rejected_regardless_of_intensity() {
        for intensity in [-10, 0, 10, 500] {
            assert!(matches!(
                FilterSettings::parse("sepia", intensity),
                Err(ConvertError::UnknownFilter(name)) if name == "sepia"
            ));
        }
    }

    #[test]
    fn default_options_use_default_quality() {
        let options = ConvertOptions::from(OutputFormat::Webp);
        assert_eq!(options.quality, DEFAULT_QUALITY);
    }
}
