//! # Hash Endpoint
//!
//! `POST /v1/hash` returns the canonical digest of a multipart `image` as
//! hex and as a circuit byte-array literal.

use axum::extract::multipart::MultipartRejection;
use axum::extract::Multipart;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extractors::image_field;
use crate::state::AppState;

/// Response body of `POST /v1/hash`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HashResponse {
    pub hash_hex: String,
    pub hash_byte_array: String,
}

/// Build the hash router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/hash", post(hash_image))
}

async fn hash_image(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<HashResponse>, AppError> {
    let image = image_field(multipart).await?;
    let digest = tokio::task::spawn_blocking(move || zkpa_crypto::hash_image(&image))
        .await
        .map_err(|e| AppError::Internal(format!("hash task failed: {e}")))??;
    Ok(Json(HashResponse {
        hash_hex: digest.to_hex(),
        hash_byte_array: digest.to_byte_array_literal(),
    }))
}
