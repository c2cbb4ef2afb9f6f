//! # Multipart Extraction
//!
//! Upload endpoints take the image as the multipart field `image`, matching
//! the form the capture clients post.

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::Multipart;

use crate::error::AppError;

/// Name of the multipart field carrying the image bytes.
pub const IMAGE_FIELD: &str = "image";

/// Pull the `image` field out of a multipart body, skipping other fields.
pub async fn image_field(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Bytes, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() == Some(IMAGE_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            tracing::debug!(bytes = bytes.len(), "image field received");
            return Ok(bytes);
        }
    }
    Err(AppError::MissingField(IMAGE_FIELD))
}
