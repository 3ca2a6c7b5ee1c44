use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

use image_converter_core::ConvertError;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("missing image file")]
    MissingFile,

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("field {field} is not an integer: {value}")]
    NotAnInteger { field: &'static str, value: String },

    #[error("failed to stage upload: {0}")]
    Staging(#[from] std::io::Error),

    #[error("worker task failed: {0}")]
    Worker(String),

    #[error(transparent)]
    Pipeline(#[from] ConvertError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Multipart(e) => e.status(),
            ApiError::MissingFile
            | ApiError::MissingField(_)
            | ApiError::NotAnInteger { .. } => StatusCode::BAD_REQUEST,
            ApiError::Staging(_) | ApiError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Pipeline(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing text. Never includes decoder or I/O details.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Multipart(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                "Image file too large".into()
            }
            ApiError::Multipart(_) => "Malformed form data".into(),
            ApiError::MissingFile => "Error receiving image file".into(),
            ApiError::MissingField(field) => format!("Field {field} is required"),
            ApiError::NotAnInteger { field, .. } => format!("Field {field} must be an integer"),
            ApiError::Staging(_) | ApiError::Worker(_) => "Internal server error".into(),
            ApiError::Pipeline(e) => match e {
                ConvertError::Decode(_) => "Invalid image file".into(),
                ConvertError::UnsupportedFormat(_) => "Unsupported output format".into(),
                ConvertError::InvalidQuality(_) => "Quality must be between 1 and 100".into(),
                ConvertError::UnknownFilter(_) => "Unknown filter name".into(),
                ConvertError::Encode(_) => "Failed to encode image".into(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::warn!("Rejected request: {}", self);
        }

        let body = ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(self.public_message()),
        };
        (status, Json(body)).into_response()
    }
}
