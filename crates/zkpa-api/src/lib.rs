//! # zkpa-api — HTTP Service for Camera Attestation
//!
//! Exposes the attestation pipeline to capture clients that upload images
//! as multipart forms.
//!
//! ## API Surface
//!
//! | Route                    | Module               | Purpose                          |
//! |--------------------------|----------------------|----------------------------------|
//! | `POST /v1/witness`       | [`routes::witness`]  | Full pipeline → JSON witness     |
//! | `POST /v1/hash`          | [`routes::hash`]     | Canonical image digest           |
//! | `GET /health/liveness`   | this module          | Process is up                    |
//! | `GET /health/readiness`  | this module          | Key material can sign and verify |
//!
//! ## Middleware Stack
//!
//! ```text
//! TraceLayer → DefaultBodyLimit → Handler
//! ```
//!
//! ## Crate Policy
//!
//! - Sits at the top of the dependency DAG.
//! - Handlers only extract, offload CPU work to the blocking pool, and map
//!   errors; every cryptographic step lives in `zkpa-zkp` / `zkpa-crypto`.
//! - All errors map to structured HTTP responses via `AppError`.

pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::{AppConfig, AppState, ConfigError};

/// Assemble the application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::witness::router())
        .merge(routes::hash::router())
        .layer(DefaultBodyLimit::max(state.config.body_limit));

    Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe: the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: certifies the configured camera key with the
/// authority key and checks the certificate.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.pipeline.config();
    let camera = config.camera.public_key();
    let failure = match zkpa_crypto::certify(&config.authority, &camera) {
        Ok(certificate) if certificate.verify(&camera) => {
            return (StatusCode::OK, "ready").into_response();
        }
        Ok(_) => "self-certificate does not verify".to_string(),
        Err(e) => format!("authority key cannot sign: {e}"),
    };
    AppError::ServiceUnavailable(failure).into_response()
}
