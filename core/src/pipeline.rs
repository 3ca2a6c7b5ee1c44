use std::fmt;
use std::io::Read;

use crate::buffer::PixelBuffer;
use crate::decode::decode;
use crate::encoder::{self, Encoded};
use crate::error::ConvertError;
use crate::format::{ConvertOptions, FilterSettings, OutputFormat, FIXED_JPEG_QUALITY};
use crate::transform;

/// One request's worth of work: what to do to the decoded image and how to encode it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Re-encode only
    Convert(ConvertOptions),
    SquareCrop,
    FitToSquare(ConvertOptions),
    Invert,
    ApplyFilter(FilterSettings),
    /// 400x400 avatar built from a fit-to-square canvas
    ProfilePicture,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Convert(_) => "convert",
            Operation::SquareCrop => "square-crop",
            Operation::FitToSquare(_) => "fit-to-square",
            Operation::Invert => "invert",
            Operation::ApplyFilter(_) => "apply-filter",
            Operation::ProfilePicture => "profile-picture",
        }
    }

    /// Target encoding. Operations without options always produce JPEG.
    pub fn output(&self) -> ConvertOptions {
        match self {
            Operation::Convert(options) | Operation::FitToSquare(options) => *options,
            Operation::SquareCrop
            | Operation::Invert
            | Operation::ApplyFilter(_)
            | Operation::ProfilePicture => {
                ConvertOptions::new(OutputFormat::Jpeg, FIXED_JPEG_QUALITY)
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConvertError> {
        self.output().validate()
    }

    /// Apply the pixel transform for this operation.
    pub fn transform(&self, buffer: PixelBuffer) -> PixelBuffer {
        match self {
            Operation::Convert(_) => buffer,
            Operation::SquareCrop => transform::square_crop(&buffer),
            Operation::FitToSquare(_) => transform::fit_to_square(&buffer),
            Operation::Invert => transform::invert(&buffer),
            Operation::ApplyFilter(settings) => transform::apply_filter(&buffer, settings),
            Operation::ProfilePicture => transform::profile_picture(&buffer),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Run an operation end to end: validate options, decode, transform, encode.
///
/// Options are checked before any bytes are read, so a bad request never pays
/// for decoding. The encoded output is fully buffered; on error nothing is returned.
pub fn run<R: Read>(input: R, operation: &Operation) -> Result<Encoded, ConvertError> {
    operation.validate()?;

    let decoded = decode(input)?;
    let (width, height) = decoded.buffer.dimensions();
    log::debug!(
        "Running {} on {}x{} {} image",
        operation,
        width,
        height,
        decoded.source_format
    );

    let transformed = operation.transform(decoded.buffer);
    let output = operation.output();

    encoder::encode(&transformed, output.format, output.quality)
}

pub fn convert<R: Read>(input: R, options: ConvertOptions) -> Result<Encoded, ConvertError> {
    run(input, &Operation::Convert(options))
}

pub fn square_crop<R: Read>(input: R) -> Result<Encoded, ConvertError> {
    run(input, &Operation::SquareCrop)
}

pub fn fit_to_square<R: Read>(input: R, options: ConvertOptions) -> Result<Encoded, ConvertError> {
    run(input, &Operation::FitToSquare(options))
}

pub fn invert<R: Read>(input: R) -> Result<Encoded, ConvertError> {
    run(input, &Operation::Invert)
}

pub fn apply_filter<R: Read>(input: R, settings: FilterSettings) -> Result<Encoded, ConvertError> {
    run(input, &Operation::ApplyFilter(settings))
}

pub fn profile_picture<R: Read>(input: R) -> Result<Encoded, ConvertError> {
    run(input, &Operation::ProfilePicture)
}
