use axum::extract::Multipart;

use crate::error::ApiError;

/// Multipart field carrying the image.
pub const FILE_FIELD: &str = "file";

/// The image part of a multipart upload.
#[derive(Debug)]
pub struct UploadedFile {
    /// Client-supplied file name, unsanitized
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Pull the `file` field out of a multipart body, skipping any others.
///
/// Browsers submit an empty part with an empty file name when no file was
/// chosen; that counts as a missing field.
pub async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await?;

        if bytes.is_empty() && file_name.as_deref().map_or(true, str::is_empty) {
            return Err(ApiError::MissingField(FILE_FIELD));
        }

        tracing::debug!(
            file = file_name.as_deref().unwrap_or("-"),
            bytes = bytes.len(),
            "Received upload"
        );

        return Ok(UploadedFile {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    Err(ApiError::MissingField(FILE_FIELD))
}
