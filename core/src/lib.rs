//! Image transformation pipeline: decode an uploaded raster, apply one
//! operation, re-encode as JPEG, PNG or WebP.

pub mod buffer;
pub mod decode;
pub mod encoder;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod transform;

pub use buffer::PixelBuffer;
pub use encoder::Encoded;
pub use error::ConvertError;
pub use format::{ConvertOptions, FilterName, FilterSettings, OutputFormat};
pub use pipeline::{run, Operation};
