use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("quality must be between 1 and 100, got {0}")]
    InvalidQuality(i32),

    #[error("unknown filter: {0}")]
    UnknownFilter(String),

    #[error("encoding failed: {0}")]
    Encode(String),
}

impl ConvertError {
    /// True when the caller's input caused the failure (bad bytes or bad options).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ConvertError::Encode(_))
    }
}
