use std::collections::HashMap;
use std::io::{BufReader, Write as IoWrite};

use axum::{
    extract::Multipart,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tempfile::NamedTempFile;

use image_converter_core::format::{DEFAULT_INTENSITY, DEFAULT_QUALITY};
use image_converter_core::pipeline::{self, Operation};
use image_converter_core::{ConvertOptions, Encoded, FilterSettings};

use crate::error::ApiError;

/// Uploaded file plus the remaining text fields of a multipart form.
struct UploadForm {
    file: Bytes,
    fields: HashMap<String, String>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut file: Option<Bytes> = None;
        let mut fields = HashMap::new();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();

            match name.as_str() {
                "file" => file = Some(field.bytes().await?),
                "" => {}
                _ => {
                    let text = field.text().await?;
                    fields.insert(name, text.trim().to_lowercase());
                }
            }
        }

        let file = file.filter(|f| !f.is_empty()).ok_or(ApiError::MissingFile)?;
        Ok(Self { file, fields })
    }

    fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    fn integer(&self, name: &'static str, default: i32) -> Result<i32, ApiError> {
        match self.text(name) {
            None => Ok(default),
            Some(value) => value.parse().map_err(|_| ApiError::NotAnInteger {
                field: name,
                value: value.to_string(),
            }),
        }
    }

    /// `output_format` is required; `quality` defaults to 80.
    fn convert_options(&self) -> Result<ConvertOptions, ApiError> {
        let format = self
            .text("output_format")
            .ok_or(ApiError::MissingField("output_format"))?;
        let quality = self.integer("quality", DEFAULT_QUALITY)?;
        Ok(ConvertOptions::parse(format, quality)?)
    }

    /// `intensity` defaults to 10. A missing name is an unknown filter.
    fn filter_settings(&self) -> Result<FilterSettings, ApiError> {
        let name = self.text("filter_name").unwrap_or_default();
        let intensity = self.integer("intensity", DEFAULT_INTENSITY)?;
        Ok(FilterSettings::parse(name, intensity)?)
    }
}

/// Stage the upload on disk and run the pipeline on the blocking pool.
///
/// The temp file is removed when the task finishes, whatever the outcome.
async fn process(file: Bytes, operation: Operation) -> Result<Response, ApiError> {
    log::info!("{}: {} byte upload", operation, file.len());

    let encoded = tokio::task::spawn_blocking(move || -> Result<Encoded, ApiError> {
        let mut staged = NamedTempFile::new()?;
        staged.write_all(&file)?;
        staged.flush()?;

        let reader = BufReader::new(staged.reopen()?);
        pipeline::run(reader, &operation).map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::Worker(e.to_string()))??;

    log::info!(
        "{}: returning {} bytes of {}",
        operation,
        encoded.bytes.len(),
        encoded.content_type
    );

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, encoded.content_type)],
        encoded.bytes,
    )
        .into_response())
}

/// POST /convert
///
/// Re-encode the image in another format.
///
/// Form fields:
/// - file: binary image data
/// - output_format: jpeg, png or webp
/// - quality (optional): 1-100 for jpeg/webp (default: 80)
pub async fn convert(multipart: Multipart) -> Result<Response, ApiError> {
    let form = UploadForm::read(multipart).await?;
    let options = form.convert_options()?;
    process(form.file, Operation::Convert(options)).await
}

/// POST /square-crop
///
/// Crop the centered square of the shorter side. Always returns JPEG.
pub async fn square_crop(multipart: Multipart) -> Result<Response, ApiError> {
    let form = UploadForm::read(multipart).await?;
    process(form.file, Operation::SquareCrop).await
}

/// POST /fit-to-square
///
/// Pad the image onto a white square of the longer side.
///
/// Form fields:
/// - file: binary image data
/// - output_format: jpeg, png or webp
/// - quality (optional): 1-100 for jpeg/webp (default: 80)
pub async fn fit_to_square(multipart: Multipart) -> Result<Response, ApiError> {
    let form = UploadForm::read(multipart).await?;
    let options = form.convert_options()?;
    process(form.file, Operation::FitToSquare(options)).await
}

/// POST /invert
pub async fn invert(multipart: Multipart) -> Result<Response, ApiError> {
    let form = UploadForm::read(multipart).await?;
    process(form.file, Operation::Invert).await
}

/// POST /apply-filter
///
/// Form fields:
/// - file: binary image data
/// - filter_name: blur or grayscale
/// - intensity (optional): blur sigma or contrast percentage (default: 10)
pub async fn apply_filter(multipart: Multipart) -> Result<Response, ApiError> {
    let form = UploadForm::read(multipart).await?;
    let settings = form.filter_settings()?;
    process(form.file, Operation::ApplyFilter(settings)).await
}

/// POST /profile-picture
///
/// 400x400 JPEG avatar: padded to a white square, then scaled.
pub async fn profile_picture(multipart: Multipart) -> Result<Response, ApiError> {
    let form = UploadForm::read(multipart).await?;
    process(form.file, Operation::ProfilePicture).await
}
