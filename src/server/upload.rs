//! Multipart form parsing shared by both summarise routes.

use crate::error::SummarizeError;
use crate::summarize::{Upload, UploadMetadata};
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use tracing::debug;

/// Fields of a summarise form.
#[derive(Debug, Default)]
pub struct SummarizeForm {
    /// The `file` part. Left empty when the form has none, so a missing
    /// file is reported the same way as a zero-byte one.
    pub upload: Upload,
    pub language: Option<String>,
    pub output_type: Option<String>,
}

/// Read every part of `multipart`.
///
/// Unknown fields are drained and ignored. `limit` is only used to report a
/// body cut off by the transport limit.
pub async fn parse_multipart(
    mut multipart: Multipart,
    limit: usize,
) -> Result<SummarizeForm, SummarizeError> {
    let mut form = SummarizeForm::default();
    let mut metadata = UploadMetadata::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, limit))?
                    .to_vec();
                debug!(
                    "Received file part: name={:?} content_type={:?} bytes={}",
                    file_name,
                    content_type,
                    bytes.len()
                );
                form.upload.bytes = bytes;
                form.upload.file_name = file_name;
                form.upload.content_type = content_type;
            }
            "pdf_id" => metadata.pdf_id = non_empty(field.text().await, limit)?,
            "original_filename" => {
                metadata.original_filename = non_empty(field.text().await, limit)?
            }
            "file_size" => metadata.file_size = non_empty(field.text().await, limit)?,
            "language" => form.language = non_empty(field.text().await, limit)?,
            "output_type" => form.output_type = non_empty(field.text().await, limit)?,
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await;
            }
        }
    }

    form.upload.metadata = metadata;
    Ok(form)
}

fn non_empty(
    value: Result<String, MultipartError>,
    limit: usize,
) -> Result<Option<String>, SummarizeError> {
    let value = value.map_err(|e| multipart_error(e, limit))?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

fn multipart_error(e: MultipartError, limit: usize) -> SummarizeError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        SummarizeError::UploadTooLarge { size: None, limit }
    } else {
        SummarizeError::MalformedUpload(e.body_text())
    }
}
