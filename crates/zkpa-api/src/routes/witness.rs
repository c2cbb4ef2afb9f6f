//! # Witness Endpoint
//!
//! `POST /v1/witness` takes a multipart `image`, runs the full attestation
//! pipeline with a fresh nonce and the configured scalar policy, and
//! returns the witness bundle as JSON.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use uuid::Uuid;

use zkpa_zkp::WitnessBundle;

use crate::error::AppError;
use crate::extractors::image_field;
use crate::state::AppState;

/// Build the witness router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/witness", post(create_witness))
}

async fn create_witness(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<WitnessBundle>, AppError> {
    let image = image_field(multipart).await?;
    let request_id = Uuid::new_v4();
    let pipeline = state.pipeline.clone();

    let witness = tokio::task::spawn_blocking(move || {
        let _span = tracing::info_span!("attest", %request_id).entered();
        pipeline.attest(&image)
    })
    .await
    .map_err(|e| AppError::Internal(format!("attestation task failed: {e}")))??;

    tracing::info!(%request_id, image_hash = %witness.image_hash.to_hex(), "witness issued");
    Ok(Json(witness))
}
